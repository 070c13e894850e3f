use super::super::context::RenderContext;
use super::super::errors::CypherBuildError;
use super::super::references::Variable;
use super::{join_lines, ChainClauses, Clauses, Statement};

const DEFAULT_SCOPE_BASE: &str = "call";

/// `CALL { WITH imports ... }` subquery.
///
/// The body is rendered in a fresh scope whose prefix is allocated in the
/// enclosing scope, so every alias and parameter generated inside is disjoint
/// from the names outside. Only the imported variables are visible in the
/// body; variables the body returns become visible after the CALL.
#[derive(Debug, Clone)]
pub struct Call {
    inner: Box<Statement>,
    imports: Vec<Variable>,
    prefix: Option<String>,
    clauses: Clauses,
}

impl Call {
    pub fn new(inner: impl Into<Statement>) -> Self {
        Call {
            inner: Box::new(inner.into()),
            imports: Vec::new(),
            prefix: None,
            clauses: Clauses::default(),
        }
    }

    pub fn import(mut self, variable: &Variable) -> Self {
        self.imports.push(variable.clone());
        self
    }

    /// Base of the body's scope prefix; defaults to the first import.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        for variable in &self.imports {
            ctx.require_declared(variable, "CALL")?;
        }
        let import_names: Vec<String> = self
            .imports
            .iter()
            .map(|variable| ctx.variable_name(variable))
            .collect();
        let base = match (&self.prefix, self.imports.first()) {
            (Some(prefix), _) => prefix.clone(),
            (None, Some(first)) => ctx.base_for(first),
            (None, None) => DEFAULT_SCOPE_BASE.to_string(),
        };

        let inner = &self.inner;
        let body = ctx.in_child_scope(&base, &self.imports, |ctx| {
            let text = inner.render(ctx)?;
            if import_names.is_empty() {
                Ok(text)
            } else {
                Ok(format!("WITH {}\n{}", import_names.join(", "), text))
            }
        })?;

        let mut returned = Vec::new();
        self.inner.collect_returned(&mut returned);
        for variable in &returned {
            ctx.declare(variable);
        }
        log::trace!(
            "Rendered CALL subquery importing [{}] at depth {}",
            import_names.join(", "),
            ctx.depth()
        );

        let head = format!("CALL {{\n{}\n}}", ctx.indent(&body));
        let children = self.clauses.render(ctx)?;
        Ok(join_lines(head, children))
    }
}

impl ChainClauses for Call {
    fn clauses_mut(&mut self) -> &mut Clauses {
        &mut self.clauses
    }
}
