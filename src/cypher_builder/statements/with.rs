use super::super::context::RenderContext;
use super::super::errors::CypherBuildError;
use super::return_clause::{render_items, ProjectionItem};
use super::{join_lines, ChainClauses, Clauses};

/// `WITH items` or `WITH *`, followed by its own child clauses.
#[derive(Debug, Clone)]
pub struct With {
    items: Vec<ProjectionItem>,
    star: bool,
    distinct: bool,
    clauses: Clauses,
}

impl With {
    pub fn new(items: Vec<ProjectionItem>) -> Self {
        With {
            items,
            star: false,
            distinct: false,
            clauses: Clauses::default(),
        }
    }

    /// `WITH *`
    pub fn all() -> Self {
        With {
            items: Vec::new(),
            star: true,
            distinct: false,
            clauses: Clauses::default(),
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        let keyword = if self.distinct { "WITH DISTINCT" } else { "WITH" };
        let head = if self.star {
            format!("{} *", keyword)
        } else {
            let items = render_items(&self.items, ctx, "WITH")?;
            let introduced: Vec<_> = self
                .items
                .iter()
                .filter_map(ProjectionItem::introduced)
                .collect();
            ctx.retain_declared(&introduced);
            format!("{} {}", keyword, items)
        };
        let children = self.clauses.render(ctx)?;
        Ok(join_lines(head, children))
    }
}

impl ChainClauses for With {
    fn clauses_mut(&mut self) -> &mut Clauses {
        &mut self.clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher_builder::context::RenderOptions;
    use crate::cypher_builder::expr::{count, Expr};
    use crate::cypher_builder::predicate::gt;
    use crate::cypher_builder::references::Variable;
    use crate::cypher_builder::statements::Return;

    #[test]
    fn test_with_star_and_children() {
        let mut ctx = RenderContext::new(RenderOptions::default());
        let mut with = With::all();
        with.limit(10);
        assert_eq!(with.render(&mut ctx).unwrap(), "WITH *\nLIMIT $param0");
    }

    #[test]
    fn test_aliases_become_visible_to_where() {
        let mut ctx = RenderContext::new(RenderOptions::default());
        let node = Variable::node(["Actor"]);
        ctx.declare(&node);
        let total = Variable::value();
        let mut with = With::new(vec![ProjectionItem::aliased(count(&node), &total)]);
        with.and_where(gt(&total, Expr::param(2)));
        with.returning(Return::projection(&total, &[], None));
        assert_eq!(
            with.render(&mut ctx).unwrap(),
            "WITH count(this0) AS var0\nWHERE var0 > $param0\nRETURN var0"
        );
    }

    #[test]
    fn test_variables_dropped_by_with_are_out_of_scope() {
        let mut ctx = RenderContext::new(RenderOptions::default());
        let this = Variable::named_node("this", ["Movie"]);
        ctx.declare(&this);
        let total = Variable::value();
        let mut with = With::new(vec![ProjectionItem::aliased(count(&this), &total)]);
        with.returning(Return::projection(&this, &["title"], None));
        assert_eq!(
            with.render(&mut ctx),
            Err(CypherBuildError::UndeclaredVariable {
                name: "this".to_string(),
                clause: "RETURN",
            })
        );
    }

    #[test]
    fn test_with_star_keeps_scope() {
        let mut ctx = RenderContext::new(RenderOptions::default());
        let this = Variable::named_node("this", ["Movie"]);
        ctx.declare(&this);
        let mut with = With::all();
        with.returning(Return::projection(&this, &["title"], None));
        assert_eq!(
            with.render(&mut ctx).unwrap(),
            "WITH *\nRETURN this { .title }"
        );
    }

    #[test]
    fn test_empty_with_is_rejected() {
        let mut ctx = RenderContext::new(RenderOptions::default());
        assert_eq!(
            With::new(Vec::new()).render(&mut ctx),
            Err(CypherBuildError::EmptyProjection { clause: "WITH" })
        );
    }
}
