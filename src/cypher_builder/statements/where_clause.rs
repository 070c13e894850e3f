use super::super::context::RenderContext;
use super::super::errors::CypherBuildError;
use super::super::expr::Expr;
use super::super::predicate::{and, eq, Predicate};
use super::super::references::{Param, Variable};

/// What can be attached as a filter: a compiled predicate (possibly absent)
/// or a property equality map on a variable.
#[derive(Debug, Clone)]
pub enum WhereInput {
    Predicate(Option<Predicate>),
    Params(Variable, Vec<(String, Param)>),
}

impl WhereInput {
    fn into_predicate(self) -> Option<Predicate> {
        match self {
            WhereInput::Predicate(predicate) => predicate,
            WhereInput::Params(variable, params) => and(
                params
                    .into_iter()
                    .map(|(key, param)| Some(eq(variable.property(key), Expr::Param(param)))),
            ),
        }
    }
}

impl From<Predicate> for WhereInput {
    fn from(predicate: Predicate) -> Self {
        WhereInput::Predicate(Some(predicate))
    }
}

impl From<Option<Predicate>> for WhereInput {
    fn from(predicate: Option<Predicate>) -> Self {
        WhereInput::Predicate(predicate)
    }
}

/// `WHERE p1 AND p2 ...`; renders nothing when it holds no predicate.
#[derive(Debug, Clone, Default)]
pub struct Where {
    predicates: Vec<Predicate>,
}

impl Where {
    pub fn new(input: impl Into<WhereInput>) -> Self {
        let mut clause = Where::default();
        clause.add_where_params(input);
        clause
    }

    /// AND another filter into this clause.
    pub fn add_where_params(&mut self, input: impl Into<WhereInput>) {
        if let Some(predicate) = input.into().into_predicate() {
            self.predicates.push(predicate);
        }
    }

    pub(crate) fn merge(&mut self, other: Where) {
        self.predicates.extend(other.predicates);
    }

    pub fn predicate(&self) -> Option<Predicate> {
        and(self.predicates.iter().cloned().map(Some))
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        let rendered = match self.predicate() {
            Some(predicate) => predicate.render(ctx)?,
            None => None,
        };
        Ok(rendered
            .map(|text| format!("WHERE {}", text))
            .unwrap_or_default())
    }
}
