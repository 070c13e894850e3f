use super::element::{
    Direction, FieldDescriptor, FieldKind, FilterOperator, NodeDescriptor, RelationshipField,
    ScalarField, ScalarType,
};
use super::errors::GraphSchemaError;
use super::graph_schema::GraphSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Element descriptors are defined in YAML with the following structure:
///
/// ```yaml
/// name: movies                  # Optional configuration name
/// nodes:
///   - name: Movie               # GraphQL type name
///     labels: [Movie, Film]     # Storage labels (default: [name])
///     fields:
///       - name: title
///         type: String
///       - name: releasedIn
///         type: Int
///         property: released    # Storage property (default: name)
///       - name: tags
///         type: String
///         list: true
///       - name: actors
///         relationship:
///           type: ACTED_IN
///           direction: IN
///           target: Actor
///           properties:         # Scalar properties on the relationship
///             - name: role
///               type: String
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSchemaConfig {
    /// Optional schema name
    #[serde(default)]
    pub name: Option<String>,
    pub nodes: Vec<NodeDefinition>,
}

/// Node definition in schema config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub name: String,
    /// Storage labels; defaults to the node name
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// Field definition: either a scalar (`type`) or a `relationship`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub scalar_type: Option<ScalarType>,
    #[serde(default)]
    pub list: bool,
    /// Storage property name when it differs from the field name
    #[serde(default)]
    pub property: Option<String>,
    /// Explicit operator suffixes; defaults depend on the scalar type
    #[serde(default)]
    pub operators: Option<Vec<FilterOperator>>,
    #[serde(default)]
    pub relationship: Option<RelationshipDefinition>,
}

/// Relationship definition in schema config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipDefinition {
    #[serde(rename = "type")]
    pub type_name: String,
    pub direction: Direction,
    pub target: String,
    /// `false` for single-node relationship fields
    #[serde(default = "default_true")]
    pub list: bool,
    #[serde(default)]
    pub properties: Vec<FieldDefinition>,
}

fn default_true() -> bool {
    true
}

impl GraphSchemaConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, GraphSchemaError> {
        serde_yaml::from_str(yaml).map_err(|e| GraphSchemaError::ConfigParseError {
            error: e.to_string(),
        })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, GraphSchemaError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            GraphSchemaError::ConfigReadError {
                error: format!("{}: {}", path.as_ref().display(), e),
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Convert definitions into a validated [`GraphSchema`].
    pub fn to_graph_schema(&self) -> Result<GraphSchema, GraphSchemaError> {
        let nodes = self
            .nodes
            .iter()
            .map(NodeDefinition::to_descriptor)
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "Loaded graph schema config '{}' with {} nodes",
            self.name.as_deref().unwrap_or("default"),
            nodes.len()
        );
        GraphSchema::from_nodes(nodes)
    }
}

impl NodeDefinition {
    fn to_descriptor(&self) -> Result<NodeDescriptor, GraphSchemaError> {
        let fields = self
            .fields
            .iter()
            .map(|field| field.to_descriptor(&self.name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NodeDescriptor {
            name: self.name.clone(),
            labels: self
                .labels
                .clone()
                .unwrap_or_else(|| vec![self.name.clone()]),
            fields,
        })
    }
}

impl FieldDefinition {
    fn to_descriptor(&self, owner: &str) -> Result<FieldDescriptor, GraphSchemaError> {
        let kind = match (&self.scalar_type, &self.relationship) {
            (Some(scalar_type), None) => FieldKind::Scalar(ScalarField {
                scalar_type: *scalar_type,
                is_list: self.list,
                operators: self.operators.clone(),
            }),
            (None, Some(rel)) => {
                let owner_path = format!("{}.{}", owner, self.name);
                let properties = rel
                    .properties
                    .iter()
                    .map(|p| {
                        let descriptor = p.to_descriptor(&owner_path)?;
                        match descriptor.kind {
                            FieldKind::Scalar(_) => Ok(descriptor),
                            FieldKind::Relationship(_) => {
                                Err(GraphSchemaError::AmbiguousFieldKind {
                                    node: owner_path.clone(),
                                    field: p.name.clone(),
                                })
                            }
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                FieldKind::Relationship(RelationshipField {
                    rel_type: rel.type_name.clone(),
                    direction: rel.direction,
                    target: rel.target.clone(),
                    is_list: rel.list,
                    properties,
                })
            }
            _ => {
                return Err(GraphSchemaError::AmbiguousFieldKind {
                    node: owner.to_string(),
                    field: self.name.clone(),
                })
            }
        };
        Ok(FieldDescriptor {
            name: self.name.clone(),
            db_property: self.property.clone(),
            kind,
        })
    }
}
