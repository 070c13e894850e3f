//! Clause nodes of the statement tree.
//!
//! `Match`, `With` and `Call` own an ordered list of child clauses rendered
//! after their own text, one clause per line. Each owner keeps at most one
//! `Where`; later filters are merged into it.

pub mod call;
pub mod match_clause;
pub mod order_by;
pub mod pagination;
pub mod return_clause;
pub mod where_clause;
pub mod with;

pub use call::Call;
pub use match_clause::Match;
pub use order_by::{OrderBy, SortDirection};
pub use pagination::{Limit, Skip};
pub use return_clause::{ProjectionItem, Return};
pub use where_clause::{Where, WhereInput};
pub use with::With;

use super::context::RenderContext;
use super::errors::CypherBuildError;
use super::references::Variable;

#[derive(Debug, Clone)]
pub enum Statement {
    Match(Match),
    Where(Where),
    Return(Return),
    Call(Call),
    With(With),
    OrderBy(OrderBy),
    Skip(Skip),
    Limit(Limit),
}

impl Statement {
    /// Render this clause and its children. An empty string means the clause
    /// has nothing to emit (e.g. a `Where` without predicates).
    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        match self {
            Statement::Match(clause) => clause.render(ctx),
            Statement::Where(clause) => clause.render(ctx),
            Statement::Return(clause) => clause.render(ctx),
            Statement::Call(clause) => clause.render(ctx),
            Statement::With(clause) => clause.render(ctx),
            Statement::OrderBy(clause) => clause.render(ctx),
            Statement::Skip(clause) => Ok(clause.render(ctx)),
            Statement::Limit(clause) => Ok(clause.render(ctx)),
        }
    }

    /// Variables made visible to the enclosing scope by the RETURN clauses of
    /// this statement. Nested CALL bodies are not searched.
    pub(crate) fn collect_returned(&self, out: &mut Vec<Variable>) {
        match self {
            Statement::Return(clause) => out.extend(clause.returned_variables()),
            Statement::Match(clause) => clause.clauses().collect_returned(out),
            Statement::With(clause) => clause.clauses().collect_returned(out),
            Statement::Call(clause) => clause.clauses().collect_returned(out),
            _ => {}
        }
    }
}

macro_rules! impl_from_clause {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Statement {
                fn from(clause: $variant) -> Self {
                    Statement::$variant(clause)
                }
            }
        )*
    };
}

impl_from_clause!(Match, Where, Return, Call, With, OrderBy, Skip, Limit);

/// Ordered child clauses with a single merged `Where`.
#[derive(Debug, Clone, Default)]
pub struct Clauses {
    children: Vec<Statement>,
    where_index: Option<usize>,
}

impl Clauses {
    pub fn push(&mut self, statement: impl Into<Statement>) {
        match (statement.into(), self.where_index) {
            (Statement::Where(incoming), Some(index)) => {
                if let Statement::Where(existing) = &mut self.children[index] {
                    existing.merge(incoming);
                }
            }
            (Statement::Where(incoming), None) => {
                self.where_index = Some(self.children.len());
                self.children.push(Statement::Where(incoming));
            }
            (other, _) => self.children.push(other),
        }
    }

    pub fn and_where(&mut self, input: impl Into<WhereInput>) {
        self.push(Where::new(input));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<Vec<String>, CypherBuildError> {
        let mut lines = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let text = child.render(ctx)?;
            if !text.is_empty() {
                lines.push(text);
            }
        }
        Ok(lines)
    }

    fn collect_returned(&self, out: &mut Vec<Variable>) {
        for child in &self.children {
            child.collect_returned(out);
        }
    }
}

/// Builder methods shared by clauses that own child clauses.
pub trait ChainClauses: Sized {
    fn clauses_mut(&mut self) -> &mut Clauses;

    /// Add a filter; merges into the existing `WHERE` if there is one.
    fn and_where(&mut self, input: impl Into<WhereInput>) -> &mut Self {
        self.clauses_mut().and_where(input);
        self
    }

    fn returning(&mut self, clause: Return) -> &mut Self {
        self.clauses_mut().push(clause);
        self
    }

    fn call(&mut self, clause: Call) -> &mut Self {
        self.clauses_mut().push(clause);
        self
    }

    fn with(&mut self, clause: With) -> &mut Self {
        self.clauses_mut().push(clause);
        self
    }

    fn order_by(&mut self, clause: OrderBy) -> &mut Self {
        self.clauses_mut().push(clause);
        self
    }

    fn skip(&mut self, offset: u64) -> &mut Self {
        self.clauses_mut().push(Skip::new(offset));
        self
    }

    fn limit(&mut self, limit: u64) -> &mut Self {
        self.clauses_mut().push(Limit::new(limit));
        self
    }
}

/// Join a clause's own line with its rendered children.
pub(crate) fn join_lines(head: String, children: Vec<String>) -> String {
    if children.is_empty() {
        head
    } else {
        format!("{}\n{}", head, children.join("\n"))
    }
}
