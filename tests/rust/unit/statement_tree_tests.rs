use graphql_cypher::cypher_builder::expr::{collect, Expr};
use graphql_cypher::cypher_builder::predicate::{eq, gt};
use graphql_cypher::cypher_builder::{
    build, Call, ChainClauses, CypherBuildError, Match, NodePattern, Param, Params, Pattern,
    ProjectionItem, RelationshipPattern, RenderOptions, Return, Variable, Where, WhereInput,
};
use graphql_cypher::graph_catalog::Direction;
use regex::Regex;
use std::collections::BTreeSet;

/// Every `$name` in the text has a table entry and vice versa.
fn assert_params_correspond(cypher: &str, params: &Params) {
    let placeholder = Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    let in_text: BTreeSet<String> = placeholder
        .captures_iter(cypher)
        .map(|c| c[1].to_string())
        .collect();
    let in_table: BTreeSet<String> = params.keys().cloned().collect();
    assert_eq!(in_text, in_table, "placeholders and table differ in:\n{}", cypher);
}

/// CALL that filters and collects the linked items, nesting `depth` levels.
fn subquery(parent: &Variable, depth: u64) -> (Call, Variable) {
    let rel = Variable::relationship("LINK");
    let child = Variable::node(["Item"]);
    let result = Variable::value();
    let mut inner = Match::new(
        Pattern::new(NodePattern::new(parent).without_labels()).related(
            RelationshipPattern::new(&rel, Direction::Outgoing),
            NodePattern::new(&child),
        ),
    );
    inner.and_where(gt(child.property("rank"), Expr::param(depth)));
    let mut returned = Return::new(vec![ProjectionItem::aliased(collect(&child), &result)]);
    if depth > 1 {
        let (nested, nested_result) = subquery(&child, depth - 1);
        inner.call(nested);
        returned = returned.item(ProjectionItem::new(&nested_result));
    }
    inner.returning(returned);
    (Call::new(inner).import(parent), result)
}

#[test]
fn test_three_level_nesting_has_disjoint_names() {
    let this = Variable::named_node("this", ["Item"]);
    let mut root = Match::new(NodePattern::new(&this));
    root.and_where(eq(this.property("id"), Expr::param("root")));
    let (first, first_result) = subquery(&this, 3);
    let (second, second_result) = subquery(&this, 3);
    root.call(first).call(second);
    root.returning(Return::new(vec![
        ProjectionItem::new(&first_result),
        ProjectionItem::new(&second_result),
    ]));

    let result = build(&root.into(), &RenderOptions::default()).unwrap();
    assert_params_correspond(&result.cypher, &result.params);
    // one root filter plus one per subquery level
    assert_eq!(result.params.len(), 7);

    let aliases = Regex::new(r"\[(\w+):LINK\]").unwrap();
    let rel_names: Vec<String> = aliases
        .captures_iter(&result.cypher)
        .map(|c| c[1].to_string())
        .collect();
    let unique: BTreeSet<&String> = rel_names.iter().collect();
    assert_eq!(rel_names.len(), 6);
    assert_eq!(unique.len(), 6, "aliases collide: {:?}", rel_names);

    assert!(result.cypher.contains("CALL {\n    WITH this\n"));
    assert!(result
        .cypher
        .contains("    CALL {\n        WITH this0_this1\n"));
    assert!(result.cypher.contains("(this0_this2_this2_this1:Item)"));
}

#[test]
fn test_where_merge_via_statement_and_params() {
    let this = Variable::named_node("this", ["Movie"]);
    let mut root = Match::new(NodePattern::new(&this));
    root.and_where(eq(this.property("title"), Expr::param("Matrix")));
    root.clauses_mut().push(Where::new(WhereInput::Params(
        this.clone(),
        vec![("year".to_string(), Param::new(1999))],
    )));
    root.returning(Return::projection(&this, &["title"], None));

    let result = build(&root.into(), &RenderOptions::default()).unwrap();
    assert_eq!(
        result.cypher,
        "MATCH (this:Movie)\nWHERE (this.title = $param0 AND this.year = $param1)\nRETURN this { .title }"
    );
    assert_params_correspond(&result.cypher, &result.params);
}

#[test]
fn test_build_fails_on_undeclared_projection() {
    let this = Variable::named_node("this", ["Movie"]);
    let other = Variable::node(["Actor"]);
    let mut root = Match::new(NodePattern::new(&this));
    root.returning(Return::projection(&other, &["name"], None));
    assert!(matches!(
        build(&root.into(), &RenderOptions::default()),
        Err(CypherBuildError::UndeclaredVariable { .. })
    ));
}

#[test]
fn test_same_param_reused_binds_once() {
    let this = Variable::named_node("this", ["Movie"]);
    let shared = Param::new("x");
    let mut root = Match::new(NodePattern::new(&this));
    root.and_where(eq(this.property("a"), shared.clone()));
    root.and_where(eq(this.property("b"), shared));
    let result = build(&root.into(), &RenderOptions::default()).unwrap();
    assert_eq!(
        result.cypher,
        "MATCH (this:Movie)\nWHERE (this.a = $param0 AND this.b = $param0)"
    );
    assert_eq!(result.params.len(), 1);
}
