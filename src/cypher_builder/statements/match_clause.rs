use super::super::context::RenderContext;
use super::super::errors::CypherBuildError;
use super::super::pattern::{NodePattern, Pattern};
use super::super::references::{Param, Variable};
use super::{join_lines, ChainClauses, Clauses, WhereInput};

/// `MATCH <pattern>` followed by its child clauses.
#[derive(Debug, Clone)]
pub struct Match {
    pattern: Pattern,
    optional: bool,
    clauses: Clauses,
}

impl Match {
    pub fn new(pattern: impl Into<Pattern>) -> Self {
        Match {
            pattern: pattern.into(),
            optional: false,
            clauses: Clauses::default(),
        }
    }

    /// `MATCH (var:Label { key: $param, ... })`
    pub fn node_with_params(variable: &Variable, params: Vec<(String, Param)>) -> Self {
        Match::new(NodePattern::new(variable).with_properties(params))
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Consuming form of [`ChainClauses::and_where`].
    pub fn with_where(mut self, input: impl Into<WhereInput>) -> Self {
        self.clauses.and_where(input);
        self
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        for variable in self.pattern.variables() {
            ctx.declare(variable);
        }
        let keyword = if self.optional { "OPTIONAL MATCH" } else { "MATCH" };
        let head = format!("{} {}", keyword, self.pattern.render(ctx)?);
        let children = self.clauses.render(ctx)?;
        Ok(join_lines(head, children))
    }
}

impl ChainClauses for Match {
    fn clauses_mut(&mut self) -> &mut Clauses {
        &mut self.clauses
    }
}
