use graphql_cypher::graph_catalog::{
    Direction, FilterOperator, GraphSchemaConfig, GraphSchemaError, ScalarType,
};
use std::io::Write;

const SCHEMA_YAML: &str = r#"
name: supply_chain
nodes:
  - name: Component
    fields:
      - name: uuid
        type: ID
      - name: upstreamProcess
        relationship:
          type: OUTPUT
          direction: IN
          target: Process
          list: false
  - name: Process
    fields:
      - name: uuid
        type: ID
      - name: componentInputs
        relationship:
          type: INPUT
          direction: INCOMING
          target: Component
"#;

#[test]
fn test_load_schema_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", SCHEMA_YAML).unwrap();

    let schema = GraphSchemaConfig::from_yaml_file(file.path())
        .unwrap()
        .to_graph_schema()
        .unwrap();
    assert_eq!(schema.len(), 2);

    let component = schema.node("Component").unwrap();
    let upstream = component.relationship_field("upstreamProcess").unwrap();
    assert_eq!(upstream.direction, Direction::Incoming);
    assert!(!upstream.is_list);

    let process = schema.node("Process").unwrap();
    let inputs = process.relationship_field("componentInputs").unwrap();
    assert!(inputs.is_list);
    assert_eq!(inputs.target, "Component");

    let uuid = component.field("uuid").unwrap();
    assert_eq!(uuid.as_scalar().unwrap().scalar_type, ScalarType::ID);
    assert!(uuid.allows(FilterOperator::StartsWith));
}

#[test]
fn test_unknown_target_in_yaml() {
    let yaml = r#"
nodes:
  - name: Component
    fields:
      - name: upstreamProcess
        relationship:
          type: OUTPUT
          direction: IN
          target: Process
"#;
    let err = GraphSchemaConfig::from_yaml_str(yaml)
        .unwrap()
        .to_graph_schema()
        .unwrap_err();
    assert!(matches!(err, GraphSchemaError::InvalidTarget { .. }));
}

#[test]
fn test_duplicate_node_in_yaml() {
    let yaml = r#"
nodes:
  - name: Movie
  - name: Movie
"#;
    let err = GraphSchemaConfig::from_yaml_str(yaml)
        .unwrap()
        .to_graph_schema()
        .unwrap_err();
    assert_eq!(
        err,
        GraphSchemaError::DuplicateNode {
            node: "Movie".to_string()
        }
    );
}
