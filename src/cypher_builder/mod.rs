//! Composable Cypher statement tree.
//!
//! Callers assemble [`statements`] around [`pattern`]s and [`predicate`]s built
//! from [`references`], then call [`build`] to get the query text and its
//! parameter table. Aliases and parameter names are generated during that
//! single render pass.

pub mod context;
pub mod errors;
pub mod expr;
pub mod pattern;
pub mod predicate;
pub mod query;
pub mod references;
pub mod statements;

pub use context::{Params, RenderContext, RenderOptions};
pub use errors::CypherBuildError;
pub use expr::{Expr, MapProjection};
pub use pattern::{NodePattern, Pattern, RelationshipPattern};
pub use predicate::Predicate;
pub use query::{build, build_predicate, CypherResult};
pub use references::{Param, PropertyRef, Variable, VariableKind};
pub use statements::{
    Call, ChainClauses, Limit, Match, OrderBy, ProjectionItem, Return, Skip, SortDirection,
    Statement, Where, WhereInput, With,
};
