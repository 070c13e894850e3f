use graphql_cypher::graph_catalog::{GraphSchema, GraphSchemaConfig};
use regex::Regex;
use std::collections::BTreeSet;

pub const SUPPLY_CHAIN_YAML: &str = r#"
name: supply_chain
nodes:
  - name: Component
    fields:
      - name: uuid
        type: String
      - name: name
        type: String
      - name: weight
        type: Float
      - name: upstreamProcess
        relationship:
          type: OUTPUT
          direction: IN
          target: Process
          list: false
  - name: Process
    fields:
      - name: uuid
        type: String
      - name: name
        type: String
      - name: componentInputs
        relationship:
          type: INPUT
          direction: IN
          target: Component
          properties:
            - name: quantity
              type: Int
      - name: componentOutputs
        relationship:
          type: OUTPUT
          direction: OUT
          target: Component
  - name: Movie
    fields:
      - name: title
        type: String
"#;

pub fn supply_chain() -> GraphSchema {
    GraphSchemaConfig::from_yaml_str(SUPPLY_CHAIN_YAML)
        .expect("fixture parses")
        .to_graph_schema()
        .expect("fixture is valid")
}

/// Assert that every `$name` in `cypher` is a key of `params` and vice versa.
pub fn assert_params_correspond(cypher: &str, params: &serde_json::Map<String, serde_json::Value>) {
    let placeholder = Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    let in_text: BTreeSet<String> = placeholder
        .captures_iter(cypher)
        .map(|c| c[1].to_string())
        .collect();
    let in_table: BTreeSet<String> = params.keys().cloned().collect();
    assert_eq!(in_text, in_table, "placeholders and table differ in:\n{}", cypher);
}
