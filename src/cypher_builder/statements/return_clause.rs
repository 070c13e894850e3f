use super::super::context::RenderContext;
use super::super::errors::CypherBuildError;
use super::super::expr::{Expr, MapProjection};
use super::super::references::Variable;
use crate::utils::naming::escape_identifier;

#[derive(Debug, Clone)]
enum Alias {
    Variable(Variable),
    Name(String),
}

/// One `expr [AS alias]` entry of a RETURN or WITH.
#[derive(Debug, Clone)]
pub struct ProjectionItem {
    expr: Expr,
    alias: Option<Alias>,
}

impl ProjectionItem {
    pub fn new(expr: impl Into<Expr>) -> Self {
        ProjectionItem {
            expr: expr.into(),
            alias: None,
        }
    }

    /// `expr AS <variable>`; the alias is a variable the following clauses
    /// (or the enclosing scope, for a CALL body) can refer to.
    pub fn aliased(expr: impl Into<Expr>, alias: &Variable) -> Self {
        ProjectionItem {
            expr: expr.into(),
            alias: Some(Alias::Variable(alias.clone())),
        }
    }

    pub fn named(expr: impl Into<Expr>, alias: impl Into<String>) -> Self {
        ProjectionItem {
            expr: expr.into(),
            alias: Some(Alias::Name(alias.into())),
        }
    }

    /// Variable this item introduces downstream.
    pub(crate) fn introduced(&self) -> Option<Variable> {
        match (&self.alias, &self.expr) {
            (Some(Alias::Variable(variable)), _) => Some(variable.clone()),
            (None, Expr::Variable(variable)) => Some(variable.clone()),
            _ => None,
        }
    }

    pub(crate) fn render(
        &self,
        ctx: &mut RenderContext,
        clause: &'static str,
    ) -> Result<String, CypherBuildError> {
        for variable in self.expr.referenced_variables() {
            ctx.require_declared(variable, clause)?;
        }
        let text = self.expr.render(ctx)?;
        Ok(match &self.alias {
            None => text,
            Some(Alias::Variable(alias)) => match &self.expr {
                Expr::Variable(variable) if variable.same_as(alias) => text,
                _ => format!("{} AS {}", text, ctx.variable_name(alias)),
            },
            Some(Alias::Name(name)) => format!("{} AS {}", text, escape_identifier(name)),
        })
    }
}

pub(crate) fn render_items(
    items: &[ProjectionItem],
    ctx: &mut RenderContext,
    clause: &'static str,
) -> Result<String, CypherBuildError> {
    if items.is_empty() {
        return Err(CypherBuildError::EmptyProjection { clause });
    }
    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        rendered.push(item.render(ctx, clause)?);
    }
    Ok(rendered.join(", "))
}

#[derive(Debug, Clone)]
pub struct Return {
    items: Vec<ProjectionItem>,
    distinct: bool,
}

impl Return {
    pub fn new(items: Vec<ProjectionItem>) -> Self {
        Return {
            items,
            distinct: false,
        }
    }

    /// `RETURN var { .f1, .f2 } AS alias`, or `RETURN var` without fields.
    pub fn projection(variable: &Variable, fields: &[&str], alias: Option<&Variable>) -> Self {
        let expr: Expr = if fields.is_empty() {
            Expr::Variable(variable.clone())
        } else {
            fields
                .iter()
                .fold(MapProjection::new(variable), |projection, field| {
                    projection.property(*field)
                })
                .into()
        };
        let item = match alias {
            Some(alias) => ProjectionItem::aliased(expr, alias),
            None => ProjectionItem::new(expr),
        };
        Return::new(vec![item])
    }

    pub fn item(mut self, item: ProjectionItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub(crate) fn returned_variables(&self) -> Vec<Variable> {
        self.items
            .iter()
            .filter_map(ProjectionItem::introduced)
            .collect()
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        let items = render_items(&self.items, ctx, "RETURN")?;
        let keyword = if self.distinct {
            "RETURN DISTINCT"
        } else {
            "RETURN"
        };
        Ok(format!("{} {}", keyword, items))
    }
}
