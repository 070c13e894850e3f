use std::collections::HashMap;

use super::element::{FieldKind, NodeDescriptor};
use super::errors::GraphSchemaError;

/// Registry of node descriptors by GraphQL type name.
///
/// Relationship fields name their target node; the registry resolves those
/// names so descriptors can reference each other cyclically
/// (`Component.upstreamProcess` ↔ `Process.componentOutputs`).
#[derive(Debug, Clone, Default)]
pub struct GraphSchema {
    nodes: HashMap<String, NodeDescriptor>,
}

impl GraphSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry and check that every relationship target resolves.
    pub fn from_nodes(nodes: Vec<NodeDescriptor>) -> Result<Self, GraphSchemaError> {
        let mut schema = GraphSchema::new();
        for node in nodes {
            if schema.nodes.contains_key(&node.name) {
                return Err(GraphSchemaError::DuplicateNode { node: node.name });
            }
            schema.nodes.insert(node.name.clone(), node);
        }
        schema.validate()?;
        Ok(schema)
    }

    /// Insert or replace a descriptor without validating targets.
    pub fn insert(&mut self, node: NodeDescriptor) {
        self.nodes.insert(node.name.clone(), node);
    }

    pub fn node(&self, name: &str) -> Result<&NodeDescriptor, GraphSchemaError> {
        self.nodes.get(name).ok_or_else(|| GraphSchemaError::Node {
            node: name.to_string(),
        })
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn validate(&self) -> Result<(), GraphSchemaError> {
        for node in self.nodes.values() {
            let mut seen = std::collections::HashSet::new();
            for field in &node.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(GraphSchemaError::DuplicateField {
                        node: node.name.clone(),
                        field: field.name.clone(),
                    });
                }
                if let FieldKind::Relationship(rel) = &field.kind {
                    if !self.nodes.contains_key(&rel.target) {
                        return Err(GraphSchemaError::InvalidTarget {
                            node: node.name.clone(),
                            field: field.name.clone(),
                            target: rel.target.clone(),
                        });
                    }
                }
            }
        }
        log::debug!("GraphSchema validated: {} node descriptors", self.nodes.len());
        Ok(())
    }
}
