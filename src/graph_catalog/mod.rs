pub mod config;
pub mod element;
pub mod errors;
pub mod graph_schema;

// Re-export commonly used types
pub use config::{GraphSchemaConfig, NodeDefinition};
pub use element::{
    Direction, FieldDescriptor, FieldKind, FilterOperator, GraphElement, NodeDescriptor,
    RelationshipField, ScalarField, ScalarType,
};
pub use errors::GraphSchemaError;
pub use graph_schema::GraphSchema;
