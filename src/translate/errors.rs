//! # Translation Error Types
//!
//! - [`WhereCompileError`]: the where input does not fit the element descriptor.
//!   Every variant carries the key path of the offending entry, e.g.
//!   `OR[1].actors_SOME.name_IN`.
//! - [`TranslateError`]: umbrella for a whole read translation.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::cypher_builder::CypherBuildError;
use crate::graph_catalog::GraphSchemaError;

/// Location of an entry inside a nested where input.
///
/// A path may start at a location outside the input (`Component.where`);
/// that leading segment is displayed but does not count towards the depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
    base: usize,
}

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Root of a where input found at `location` in a larger request.
    pub fn at(location: impl Into<String>) -> Self {
        KeyPath {
            segments: vec![location.into()],
            base: 1,
        }
    }

    pub fn key(&self, key: &str) -> Self {
        let mut path = self.clone();
        path.segments.push(key.to_string());
        path
    }

    /// Append a list index to the last segment (`OR` → `OR[1]`).
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        match path.segments.last_mut() {
            Some(last) => last.push_str(&format!("[{}]", index)),
            None => path.segments.push(format!("[{}]", index)),
        }
        path
    }

    pub fn depth(&self) -> usize {
        self.segments.len() - self.base
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.segments.join("."))
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WhereCompileError {
    #[error("Unknown where field `{field}` on `{element}` at `{path}`")]
    UnknownField {
        path: KeyPath,
        element: String,
        field: String,
    },

    #[error("Field `{field}` does not support operator `{operator}` at `{path}`")]
    UnsupportedOperator {
        path: KeyPath,
        field: String,
        operator: String,
    },

    #[error("Expected {expected} at `{path}`, found {found}")]
    InvalidValueShape {
        path: KeyPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Where input exceeds the maximum nesting depth of {limit} at `{path}`")]
    NestingTooDeep { path: KeyPath, limit: usize },

    #[error(transparent)]
    Schema(#[from] GraphSchemaError),
}

impl WhereCompileError {
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            WhereCompileError::UnknownField { path, .. }
            | WhereCompileError::UnsupportedOperator { path, .. }
            | WhereCompileError::InvalidValueShape { path, .. }
            | WhereCompileError::NestingTooDeep { path, .. } => Some(path),
            WhereCompileError::Schema(_) => None,
        }
    }
}

/// JSON type name used in shape errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Where(#[from] WhereCompileError),

    #[error(transparent)]
    Build(#[from] CypherBuildError),

    #[error(transparent)]
    Schema(#[from] GraphSchemaError),

    #[error("Cannot sort `{element}` by `{field}` at `{path}`")]
    UnknownSortField {
        path: String,
        element: String,
        field: String,
    },

    #[error("Cannot select `{field}` on `{element}` at `{path}`")]
    UnknownSelectionField {
        path: String,
        element: String,
        field: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_path_display() {
        let path = KeyPath::root()
            .key("OR")
            .index(1)
            .key("actors_SOME")
            .key("name_IN");
        assert_eq!(path.to_string(), "OR[1].actors_SOME.name_IN");
        assert_eq!(path.depth(), 3);
        assert_eq!(KeyPath::root().to_string(), "<root>");
    }

    #[test]
    fn test_location_prefix_is_shown_but_not_counted() {
        let path = KeyPath::at("Component.upstreamProcess.where")
            .key("OR")
            .index(0)
            .key("label");
        assert_eq!(path.to_string(), "Component.upstreamProcess.where.OR[0].label");
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn test_error_message_includes_path() {
        let err = WhereCompileError::UnknownField {
            path: KeyPath::root().key("nme"),
            element: "Actor".to_string(),
            field: "nme".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown where field `nme` on `Actor` at `nme`"
        );
    }
}
