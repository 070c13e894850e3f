//! Build entry points: walk a statement tree once and return the Cypher text
//! together with its parameter table.

use serde::Serialize;

use super::context::{Params, RenderContext, RenderOptions};
use super::errors::CypherBuildError;
use super::predicate::Predicate;
use super::statements::Statement;

/// Rendered query text and the parameters its `$name` placeholders refer to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CypherResult {
    pub cypher: String,
    pub params: Params,
}

/// Render `root` and its children depth-first.
pub fn build(root: &Statement, options: &RenderOptions) -> Result<CypherResult, CypherBuildError> {
    let mut ctx = RenderContext::new(options.clone());
    let cypher = root.render(&mut ctx)?;
    let params = ctx.into_params();
    log::debug!(
        "Built Cypher query ({} lines, {} params)",
        cypher.lines().count(),
        params.len()
    );
    Ok(CypherResult { cypher, params })
}

/// Render a predicate on its own, for callers that splice a `WHERE` body into
/// text they produce elsewhere. Returns `None` when the predicate is empty.
pub fn build_predicate(
    predicate: &Predicate,
    options: &RenderOptions,
) -> Result<Option<CypherResult>, CypherBuildError> {
    let mut ctx = RenderContext::new(options.clone());
    let Some(cypher) = predicate.render(&mut ctx)? else {
        return Ok(None);
    };
    Ok(Some(CypherResult {
        cypher,
        params: ctx.into_params(),
    }))
}
