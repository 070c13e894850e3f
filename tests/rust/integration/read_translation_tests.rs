use graphql_cypher::config::BuilderConfig;
use graphql_cypher::translate::{translate_read, ReadRequest, TranslateError};
use serde_json::json;

use super::fixtures::{assert_params_correspond, supply_chain};

fn request(value: serde_json::Value) -> ReadRequest {
    serde_json::from_value(value).expect("request deserializes")
}

#[test]
fn test_nested_read_with_sorted_inner_list() {
    let request = request(json!({
        "where": { "uuid": "c1" },
        "selection": {
            "fields": ["uuid"],
            "relationships": [{
                "field": "upstreamProcess",
                "selection": {
                    "fields": ["uuid"],
                    "relationships": [{
                        "field": "componentInputs",
                        "sort": [{ "field": "uuid", "direction": "DESC" }],
                        "selection": { "fields": ["uuid"] }
                    }]
                }
            }]
        }
    }));

    let result =
        translate_read(&supply_chain(), "Component", &request, &BuilderConfig::default()).unwrap();
    let expected = "\
MATCH (this:Component)
WHERE this.uuid = $param0
CALL {
    WITH this
    MATCH (this)<-[this0_this0:OUTPUT]-(this0_this1:Process)
    CALL {
        WITH this0_this1
        MATCH (this0_this1)<-[this0_this2_this0:INPUT]-(this0_this2_this1:Component)
        WITH *
        ORDER BY this0_this2_this1.uuid DESC
        WITH this0_this2_this1 { .uuid } AS this0_this2_this1
        RETURN collect(this0_this2_this1) AS this0_this2_var0
    }
    WITH this0_this1 { .uuid, componentInputs: this0_this2_var0 } AS this0_this1
    RETURN head(collect(this0_this1)) AS this0_var0
}
RETURN this { .uuid, upstreamProcess: this0_var0 } AS this";
    assert_eq!(result.cypher, expected);
    assert_eq!(serde_json::to_value(&result.params).unwrap(), json!({ "param0": "c1" }));
}

#[test]
fn test_nested_connections_with_sorted_inner_edges() {
    let request = request(json!({
        "where": { "uuid": "c1" },
        "selection": {
            "fields": ["uuid"],
            "connections": [{
                "field": "upstreamProcess",
                "node": {
                    "fields": ["uuid"],
                    "connections": [{
                        "field": "componentInputs",
                        "sort": [{ "field": "uuid", "direction": "DESC" }],
                        "node": { "fields": ["uuid"] }
                    }]
                }
            }]
        }
    }));

    let result =
        translate_read(&supply_chain(), "Component", &request, &BuilderConfig::default()).unwrap();
    let expected = "\
MATCH (this:Component)
WHERE this.uuid = $param0
CALL {
    WITH this
    MATCH (this)<-[this0_this0:OUTPUT]-(this0_this1:Process)
    CALL {
        WITH this0_this1
        MATCH (this0_this1)<-[this0_this2_this0:INPUT]-(this0_this2_this1:Component)
        WITH *
        ORDER BY this0_this2_this1.uuid DESC
        WITH { node: this0_this2_this1 { .uuid } } AS this0_this2_var0
        WITH collect(this0_this2_var0) AS this0_this2_var1
        RETURN { edges: this0_this2_var1, totalCount: size(this0_this2_var1) } AS this0_this2_var2
    }
    WITH { node: this0_this1 { .uuid, componentInputsConnection: this0_this2_var2 } } AS this0_var0
    WITH collect(this0_var0) AS this0_var1
    RETURN { edges: this0_var1, totalCount: size(this0_var1) } AS this0_var2
}
RETURN this { .uuid, upstreamProcessConnection: this0_var2 } AS this";
    assert_eq!(result.cypher, expected);
    assert_eq!(serde_json::to_value(&result.params).unwrap(), json!({ "param0": "c1" }));
}

#[test]
fn test_connection_edge_properties_and_filter() {
    let request = request(json!({
        "selection": {
            "connections": [{
                "field": "componentInputs",
                "alias": "inputs",
                "where": { "edge": { "quantity_GT": 1 }, "node_NOT": { "name": "scrap" } },
                "sort": [{ "on": "edge", "field": "quantity", "direction": "DESC" }],
                "edge_fields": ["quantity"],
                "node": { "fields": ["name"] }
            }]
        }
    }));

    let result =
        translate_read(&supply_chain(), "Process", &request, &BuilderConfig::default()).unwrap();
    assert_params_correspond(&result.cypher, &result.params);
    assert!(result.cypher.contains(
        "    WHERE (this0_this0.quantity > $this0_param0 AND NOT (this0_this1.name = $this0_param1))"
    ));
    assert!(result.cypher.contains("    ORDER BY this0_this0.quantity DESC"));
    assert!(result.cypher.contains(
        "    WITH { quantity: this0_this0.quantity, node: this0_this1 { .name } } AS this0_var0"
    ));
    assert!(result
        .cypher
        .ends_with("RETURN this { inputs: this0_var2 } AS this"));
}

#[test]
fn test_sibling_selections_get_distinct_scopes() {
    let request = request(json!({
        "selection": {
            "relationships": [
                { "field": "componentInputs", "alias": "inputs", "limit": 2 },
                { "field": "componentOutputs", "alias": "outputs", "limit": 3 }
            ]
        }
    }));

    let result =
        translate_read(&supply_chain(), "Process", &request, &BuilderConfig::default()).unwrap();
    assert!(result.cypher.contains("LIMIT $this0_param0"));
    assert!(result.cypher.contains("LIMIT $this1_param0"));
    assert!(result
        .cypher
        .contains("MATCH (this)-[this1_this0:OUTPUT]->(this1_this1:Component)"));
    assert!(result
        .cypher
        .ends_with("RETURN this { inputs: this0_var0, outputs: this1_var0 } AS this"));
    assert_eq!(result.params.get("this0_param0"), Some(&json!(2)));
    assert_eq!(result.params.get("this1_param0"), Some(&json!(3)));
    assert_params_correspond(&result.cypher, &result.params);
}

#[test]
fn test_filters_inside_selections_use_scoped_params() {
    let request = request(json!({
        "where": { "name_CONTAINS": "press" },
        "selection": {
            "fields": ["name"],
            "relationships": [{
                "field": "componentInputs",
                "where": { "weight_GT": 2.5, "upstreamProcess": { "name": "cast" } },
                "selection": { "fields": ["name"] }
            }]
        }
    }));

    let result =
        translate_read(&supply_chain(), "Process", &request, &BuilderConfig::default()).unwrap();
    assert_params_correspond(&result.cypher, &result.params);
    assert_eq!(
        result.params.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["param0", "this0_param0", "this0_param1"]
    );
    assert!(result
        .cypher
        .contains("    WHERE (this0_this1.weight > $this0_param0 AND EXISTS {\n        MATCH (this0_this1)<-[:OUTPUT]-(this0_this2:Process)\n        WHERE this0_this2.name = $this0_param1\n    })"));
}

#[test]
fn test_custom_prefixes_from_config() {
    let config = BuilderConfig {
        variable_prefix: "node".to_string(),
        param_prefix: "p".to_string(),
        ..BuilderConfig::default()
    };
    let request = request(json!({
        "where": { "uuid": "c1" },
        "selection": { "fields": ["uuid"] }
    }));

    let result = translate_read(&supply_chain(), "Component", &request, &config).unwrap();
    assert_eq!(
        result.cypher,
        "MATCH (node:Component)\nWHERE node.uuid = $p0\nRETURN node { .uuid } AS node"
    );
    assert_eq!(result.params.get("p0"), Some(&json!("c1")));
}

#[test]
fn test_unknown_relationship_selection() {
    let request = request(json!({
        "selection": {
            "relationships": [{
                "field": "upstreamProcess",
                "selection": { "relationships": [{ "field": "supplier" }] }
            }]
        }
    }));

    match translate_read(&supply_chain(), "Component", &request, &BuilderConfig::default()) {
        Err(TranslateError::UnknownSelectionField { path, element, field }) => {
            assert_eq!(path, "Component.upstreamProcess.supplier");
            assert_eq!(element, "Process");
            assert_eq!(field, "supplier");
        }
        other => panic!("expected selection error, got {:?}", other),
    }
}

#[test]
fn test_nested_where_error_names_its_selection() {
    let request = request(json!({
        "selection": {
            "relationships": [{ "field": "upstreamProcess", "where": { "label": "x" } }]
        }
    }));
    match translate_read(&supply_chain(), "Component", &request, &BuilderConfig::default()) {
        Err(TranslateError::Where(err)) => assert_eq!(
            err.path().map(ToString::to_string).as_deref(),
            Some("Component.upstreamProcess.where.label")
        ),
        other => panic!("expected where error, got {:?}", other),
    }
}

#[test]
fn test_where_errors_surface_through_translation() {
    let request = request(json!({ "where": { "weight_STARTS_WITH": "1" } }));
    let err = translate_read(&supply_chain(), "Component", &request, &BuilderConfig::default())
        .unwrap_err();
    assert!(matches!(err, TranslateError::Where(_)));
}
