//! Lowering of GraphQL-style read inputs into the Cypher statement tree.
//!
//! [`create_where_predicate`] compiles a where input object against an element
//! descriptor; [`translate_read`] builds a complete read query around it.

pub mod aggregate_where;
pub mod errors;
pub mod property_where;
pub mod read;
pub mod relationship_where;
pub mod where_key;
pub mod where_predicate;

pub use errors::{KeyPath, TranslateError, WhereCompileError};
pub use read::{
    translate_read, ConnectionSelection, ConnectionSortField, ReadRequest, RelationshipSelection,
    Selection, SortField, SortTarget,
};
pub use relationship_where::Quantifier;
pub use where_predicate::{create_where_predicate, CompileContext};
