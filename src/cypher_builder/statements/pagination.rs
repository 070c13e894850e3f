use serde_json::Value;

use super::super::context::RenderContext;

/// `SKIP $paramN`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip(u64);

/// `LIMIT $paramN`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(u64);

impl Skip {
    pub fn new(offset: u64) -> Self {
        Skip(offset)
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> String {
        format!("SKIP ${}", ctx.bind(Value::from(self.0)))
    }
}

impl Limit {
    pub fn new(limit: u64) -> Self {
        Limit(limit)
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> String {
        format!("LIMIT ${}", ctx.bind(Value::from(self.0)))
    }
}
