use graphql_cypher::config::BuilderConfig;
use graphql_cypher::cypher_builder::{
    build, build_predicate, ChainClauses, CypherResult, Match, NodePattern, RenderOptions,
    Variable,
};
use graphql_cypher::translate::{create_where_predicate, CompileContext, WhereCompileError};
use serde_json::{json, Value};

use super::fixtures::{assert_params_correspond, supply_chain};

/// `MATCH (this:<node>)` filtered by `input`.
fn filtered_match(node_name: &str, input: Value) -> Result<CypherResult, WhereCompileError> {
    let schema = supply_chain();
    let ctx = CompileContext::new(&schema, &BuilderConfig::default());
    let node = schema.node(node_name)?;
    let this = Variable::named_node("this", node.labels.iter().cloned());
    let mut root = Match::new(NodePattern::new(&this));
    root.and_where(create_where_predicate(&this, &input, node, &ctx)?);
    Ok(build(&root.into(), &RenderOptions::default()).expect("tree is well formed"))
}

fn predicate_text(input: Value) -> Option<String> {
    let schema = supply_chain();
    let ctx = CompileContext::new(&schema, &BuilderConfig::default());
    let node = schema.node("Component").unwrap();
    let this = Variable::named_node("this", ["Component"]);
    create_where_predicate(&this, &input, node, &ctx)
        .unwrap()
        .map(|p| {
            build_predicate(&p, &RenderOptions::default())
                .unwrap()
                .unwrap()
                .cypher
        })
}

#[test]
fn test_equality_filter_end_to_end() {
    let result = filtered_match("Component", json!({ "uuid": "c1" })).unwrap();
    assert_eq!(result.cypher, "MATCH (this:Component)\nWHERE this.uuid = $param0");
    assert_eq!(serde_json::to_value(&result.params).unwrap(), json!({ "param0": "c1" }));
}

#[test]
fn test_single_child_and_filter_end_to_end() {
    let result = filtered_match(
        "Movie",
        json!({ "AND": [{ "title_STARTS_WITH": "Con" }] }),
    )
    .unwrap();
    assert_eq!(
        result.cypher,
        "MATCH (this:Movie)\nWHERE this.title STARTS WITH $param0"
    );
    assert_eq!(serde_json::to_value(&result.params).unwrap(), json!({ "param0": "Con" }));
    assert_eq!(
        result,
        filtered_match("Movie", json!({ "title_STARTS_WITH": "Con" })).unwrap()
    );
}

#[test]
fn test_empty_filter_emits_no_where() {
    let unfiltered = filtered_match("Component", json!({})).unwrap();
    assert_eq!(unfiltered.cypher, "MATCH (this:Component)");
    assert!(unfiltered.params.is_empty());

    let empty_and = filtered_match("Component", json!({ "AND": [] })).unwrap();
    assert_eq!(empty_and, unfiltered);
}

#[test]
fn test_implicit_and_equals_explicit_and() {
    assert_eq!(
        predicate_text(json!({ "uuid": "c1", "name_CONTAINS": "bolt" })),
        predicate_text(json!({ "AND": [{ "uuid": "c1" }, { "name_CONTAINS": "bolt" }] }))
    );
}

#[test]
fn test_or_single_child_equals_child() {
    assert_eq!(
        predicate_text(json!({ "OR": [{ "weight_GT": 1.5 }] })),
        predicate_text(json!({ "weight_GT": 1.5 }))
    );
}

#[test]
fn test_nested_boolean_structure() {
    assert_eq!(
        predicate_text(json!({
            "OR": [
                { "uuid_IN": ["a", "b"] },
                { "AND": [{ "name_NOT": "x" }, { "weight_LTE": 3 }] }
            ]
        }))
        .as_deref(),
        Some("(this.uuid IN $param0 OR (NOT (this.name = $param1) AND this.weight <= $param2))")
    );
}

#[test]
fn test_relationship_filter_through_single_relationship() {
    let result = filtered_match(
        "Component",
        json!({ "uuid": "c1", "upstreamProcess": { "name_ENDS_WITH": "ing" } }),
    )
    .unwrap();
    assert_eq!(
        result.cypher,
        "MATCH (this:Component)\n\
         WHERE (this.uuid = $param0 AND EXISTS {\n    \
             MATCH (this)<-[:OUTPUT]-(this0:Process)\n    \
             WHERE this0.name ENDS WITH $param1\n\
         })"
    );
    assert_params_correspond(&result.cypher, &result.params);
}

#[test]
fn test_connection_and_aggregate_filters_together() {
    let result = filtered_match(
        "Process",
        json!({
            "componentInputsConnection_ALL": { "edge": { "quantity_GTE": 1 } },
            "componentOutputsAggregate": { "count_LT": 3, "node": { "weight_SUM_GT": 10 } }
        }),
    )
    .unwrap();
    assert_params_correspond(&result.cypher, &result.params);
    assert_eq!(result.params.len(), 3);
    assert!(result
        .cypher
        .contains("WHERE NOT (this0.quantity >= $param0)"));
    assert!(result
        .cypher
        .contains("WITH count(this3) AS var0, sum(this3.weight) AS var1"));
    assert!(result
        .cypher
        .contains("WHERE (var0 < $param1 AND var1 > $param2)"));
}

#[test]
fn test_param_names_are_unique_across_subqueries() {
    let result = filtered_match(
        "Process",
        json!({
            "componentInputs_SOME": { "name": "a", "upstreamProcess": { "name": "b" } },
            "componentOutputs_NONE": { "name": "c" },
            "OR": [{ "name": "d" }, { "uuid": "e" }]
        }),
    )
    .unwrap();
    assert_params_correspond(&result.cypher, &result.params);
    assert_eq!(result.params.len(), 5);
    let values: Vec<&Value> = result.params.values().collect();
    assert_eq!(
        values,
        vec![&json!("a"), &json!("b"), &json!("c"), &json!("d"), &json!("e")]
    );
}

#[test]
fn test_error_carries_key_path() {
    let err = filtered_match(
        "Component",
        json!({ "OR": [{ "uuid": "c1" }, { "upstreamProcess_SOME": { "label": "x" } }] }),
    )
    .unwrap_err();
    assert_eq!(
        err.path().map(ToString::to_string).as_deref(),
        Some("OR[1].upstreamProcess_SOME.label")
    );
    assert!(err.to_string().contains("`label` on `Process`"));
}
