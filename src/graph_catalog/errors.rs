//! # Graph Schema Error Types
//!
//! Errors raised while building or querying the element descriptor registry.
//!
//! ## Error Categories
//!
//! - **Lookup Errors**: a node name the caller asked for does not exist
//! - **Definition Errors**: a YAML definition is structurally invalid
//! - **Configuration Errors**: file I/O and parsing issues during schema loading

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphSchemaError {
    #[error("No node descriptor found for `{node}`")]
    Node { node: String },
    #[error("Relationship field `{node}.{field}` targets unknown node `{target}`")]
    InvalidTarget {
        node: String,
        field: String,
        target: String,
    },
    #[error("Field `{node}.{field}` is defined more than once")]
    DuplicateField { node: String, field: String },
    #[error("Node `{node}` is defined more than once")]
    DuplicateNode { node: String },
    #[error("Field `{node}.{field}` must declare exactly one of `type` or `relationship`")]
    AmbiguousFieldKind { node: String, field: String },
    #[error("Failed to read configuration file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse configuration: {error}")]
    ConfigParseError { error: String },
}
