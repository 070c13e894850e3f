use thiserror::Error;

/// Construction invariants violated by the caller while assembling a query.
///
/// These indicate a bug in the layer that builds the statement tree, never bad
/// user data, so they are not recoverable.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CypherBuildError {
    #[error("Variable `{name}` is used by {clause} before any enclosing clause introduces it")]
    UndeclaredVariable { name: String, clause: &'static str },

    #[error("{clause} clause has no projection items")]
    EmptyProjection { clause: &'static str },
}
