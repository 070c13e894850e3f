//! Boolean predicate tree and its combinators.
//!
//! `and`/`or` accept optional children and simplify: no children gives no
//! predicate, a single child is returned unwrapped. An absent predicate makes
//! the enclosing clause omit its `WHERE`.

use super::context::RenderContext;
use super::errors::CypherBuildError;
use super::expr::Expr;
use super::references::Variable;
use super::statements::Statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Contains,
    StartsWith,
    EndsWith,
    Matches,
    IsNull,
    IsNotNull,
}

impl ComparisonOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::In => "IN",
            ComparisonOperator::Contains => "CONTAINS",
            ComparisonOperator::StartsWith => "STARTS WITH",
            ComparisonOperator::EndsWith => "ENDS WITH",
            ComparisonOperator::Matches => "=~",
            ComparisonOperator::IsNull => "IS NULL",
            ComparisonOperator::IsNotNull => "IS NOT NULL",
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(
            self,
            ComparisonOperator::IsNull | ComparisonOperator::IsNotNull
        )
    }
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub operator: ComparisonOperator,
    pub left: Expr,
    pub right: Option<Expr>,
}

/// `single(variable IN list WHERE predicate)`
#[derive(Debug, Clone)]
pub struct SinglePredicate {
    pub variable: Variable,
    pub list: Expr,
    pub predicate: Option<Predicate>,
}

#[derive(Debug, Clone)]
pub enum Predicate {
    Comparison(Comparison),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    /// Correlated `EXISTS { ... }` subquery
    Exists(Box<Statement>),
    Single(Box<SinglePredicate>),
}

pub fn and<I>(predicates: I) -> Option<Predicate>
where
    I: IntoIterator<Item = Option<Predicate>>,
{
    combine(predicates, Predicate::And)
}

pub fn or<I>(predicates: I) -> Option<Predicate>
where
    I: IntoIterator<Item = Option<Predicate>>,
{
    combine(predicates, Predicate::Or)
}

fn combine<I>(predicates: I, wrap: fn(Vec<Predicate>) -> Predicate) -> Option<Predicate>
where
    I: IntoIterator<Item = Option<Predicate>>,
{
    let mut children: Vec<Predicate> = predicates.into_iter().flatten().collect();
    match children.len() {
        0 => None,
        1 => children.pop(),
        _ => Some(wrap(children)),
    }
}

pub fn not(predicate: Predicate) -> Predicate {
    Predicate::Not(Box::new(predicate))
}

pub fn exists(statement: impl Into<Statement>) -> Predicate {
    Predicate::Exists(Box::new(statement.into()))
}

pub fn single(variable: &Variable, list: impl Into<Expr>, predicate: Option<Predicate>) -> Predicate {
    Predicate::Single(Box::new(SinglePredicate {
        variable: variable.clone(),
        list: list.into(),
        predicate,
    }))
}

pub fn compare(
    operator: ComparisonOperator,
    left: impl Into<Expr>,
    right: impl Into<Expr>,
) -> Predicate {
    Predicate::Comparison(Comparison {
        operator,
        left: left.into(),
        right: Some(right.into()),
    })
}

pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::Eq, left, right)
}

pub fn lt(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::Lt, left, right)
}

pub fn lte(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::Lte, left, right)
}

pub fn gt(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::Gt, left, right)
}

pub fn gte(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::Gte, left, right)
}

pub fn in_list(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::In, left, right)
}

pub fn contains(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::Contains, left, right)
}

pub fn starts_with(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::StartsWith, left, right)
}

pub fn ends_with(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::EndsWith, left, right)
}

pub fn matches(left: impl Into<Expr>, right: impl Into<Expr>) -> Predicate {
    compare(ComparisonOperator::Matches, left, right)
}

pub fn is_null(expr: impl Into<Expr>) -> Predicate {
    Predicate::Comparison(Comparison {
        operator: ComparisonOperator::IsNull,
        left: expr.into(),
        right: None,
    })
}

pub fn is_not_null(expr: impl Into<Expr>) -> Predicate {
    Predicate::Comparison(Comparison {
        operator: ComparisonOperator::IsNotNull,
        left: expr.into(),
        right: None,
    })
}

impl Predicate {
    /// Render to text, or `None` when the predicate reduces to nothing.
    pub(crate) fn render(
        &self,
        ctx: &mut RenderContext,
    ) -> Result<Option<String>, CypherBuildError> {
        match self {
            Predicate::Comparison(comparison) => {
                let left = comparison.left.render(ctx)?;
                let text = match (&comparison.right, comparison.operator.is_unary()) {
                    (Some(right), false) => format!(
                        "{} {} {}",
                        left,
                        comparison.operator.symbol(),
                        right.render(ctx)?
                    ),
                    _ => format!("{} {}", left, comparison.operator.symbol()),
                };
                Ok(Some(text))
            }
            Predicate::And(children) => render_junction(children, "AND", ctx),
            Predicate::Or(children) => render_junction(children, "OR", ctx),
            Predicate::Not(child) => {
                let Some(inner) = child.render(ctx)? else {
                    return Ok(None);
                };
                let already_grouped = matches!(**child, Predicate::And(_) | Predicate::Or(_))
                    && inner.starts_with('(');
                if already_grouped {
                    Ok(Some(format!("NOT {}", inner)))
                } else {
                    Ok(Some(format!("NOT ({})", inner)))
                }
            }
            Predicate::Exists(statement) => {
                let body = ctx.in_nested_scope(|ctx| statement.render(ctx))?;
                Ok(Some(format!("EXISTS {{\n{}\n}}", ctx.indent(&body))))
            }
            Predicate::Single(single) => {
                let variable = ctx.variable_name(&single.variable);
                let list = single.list.render(ctx)?;
                let predicate = match &single.predicate {
                    Some(predicate) => predicate.render(ctx)?,
                    None => None,
                };
                Ok(Some(format!(
                    "single({} IN {} WHERE {})",
                    variable,
                    list,
                    predicate.as_deref().unwrap_or("true")
                )))
            }
        }
    }
}

fn render_junction(
    children: &[Predicate],
    keyword: &str,
    ctx: &mut RenderContext,
) -> Result<Option<String>, CypherBuildError> {
    let mut parts = Vec::with_capacity(children.len());
    for child in children {
        if let Some(text) = child.render(ctx)? {
            parts.push(text);
        }
    }
    Ok(match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(format!("({})", parts.join(&format!(" {} ", keyword)))),
    })
}
