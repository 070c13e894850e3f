use serde::{Deserialize, Serialize};

use super::super::context::RenderContext;
use super::super::errors::CypherBuildError;
use super::super::expr::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// `ORDER BY a ASC, b DESC`; sort keys are inlined, never parameterized.
#[derive(Debug, Clone, Default)]
pub struct OrderBy {
    items: Vec<(Expr, SortDirection)>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(mut self, expr: impl Into<Expr>, direction: SortDirection) -> Self {
        self.items.push((expr.into(), direction));
        self
    }

    pub fn asc(self, expr: impl Into<Expr>) -> Self {
        self.by(expr, SortDirection::Asc)
    }

    pub fn desc(self, expr: impl Into<Expr>) -> Self {
        self.by(expr, SortDirection::Desc)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        if self.items.is_empty() {
            return Ok(String::new());
        }
        let mut keys = Vec::with_capacity(self.items.len());
        for (expr, direction) in &self.items {
            keys.push(format!("{} {}", expr.render(ctx)?, direction.keyword()));
        }
        Ok(format!("ORDER BY {}", keys.join(", ")))
    }
}
