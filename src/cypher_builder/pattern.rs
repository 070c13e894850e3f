//! Node/relationship chains used by MATCH, EXISTS and pattern comprehensions.

use super::context::RenderContext;
use super::errors::CypherBuildError;
use super::expr::Expr;
use super::references::{Param, Variable};
use crate::graph_catalog::Direction;
use crate::utils::naming::escape_identifier;

#[derive(Debug, Clone)]
pub struct NodePattern {
    variable: Option<Variable>,
    labels: Vec<String>,
    properties: Vec<(String, Param)>,
}

impl NodePattern {
    /// `(var:Label)` with the variable's own labels.
    pub fn new(variable: &Variable) -> Self {
        NodePattern {
            variable: Some(variable.clone()),
            labels: variable.labels().to_vec(),
            properties: Vec::new(),
        }
    }

    /// `(:Label)`
    pub fn anonymous<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NodePattern {
            variable: None,
            labels: labels.into_iter().map(Into::into).collect(),
            properties: Vec::new(),
        }
    }

    /// Reference an already bound node without repeating its labels.
    pub fn without_labels(mut self) -> Self {
        self.labels.clear();
        self
    }

    /// Inline equality map `{ key: $param }`.
    pub fn with_properties(mut self, properties: Vec<(String, Param)>) -> Self {
        self.properties = properties;
        self
    }

    fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        let mut text = String::from("(");
        if let Some(variable) = &self.variable {
            text.push_str(&ctx.variable_name(variable));
        }
        for label in &self.labels {
            text.push(':');
            text.push_str(&escape_identifier(label));
        }
        if !self.properties.is_empty() {
            let mut entries = Vec::with_capacity(self.properties.len());
            for (key, param) in &self.properties {
                entries.push(format!(
                    "{}: {}",
                    escape_identifier(key),
                    Expr::Param(param.clone()).render(ctx)?
                ));
            }
            text.push_str(&format!(" {{ {} }}", entries.join(", ")));
        }
        text.push(')');
        Ok(text)
    }
}

#[derive(Debug, Clone)]
pub struct RelationshipPattern {
    variable: Option<Variable>,
    rel_type: Option<String>,
    direction: Direction,
}

impl RelationshipPattern {
    /// `-[var:TYPE]->` using the relationship variable's type.
    pub fn new(variable: &Variable, direction: Direction) -> Self {
        RelationshipPattern {
            variable: Some(variable.clone()),
            rel_type: variable.rel_type().map(str::to_string),
            direction,
        }
    }

    /// `-[:TYPE]->`
    pub fn anonymous(rel_type: impl Into<String>, direction: Direction) -> Self {
        RelationshipPattern {
            variable: None,
            rel_type: Some(rel_type.into()),
            direction,
        }
    }

    fn render(&self, ctx: &mut RenderContext) -> String {
        let mut inner = String::new();
        if let Some(variable) = &self.variable {
            inner.push_str(&ctx.variable_name(variable));
        }
        if let Some(rel_type) = &self.rel_type {
            inner.push(':');
            inner.push_str(&escape_identifier(rel_type));
        }
        match self.direction {
            Direction::Outgoing => format!("-[{}]->", inner),
            Direction::Incoming => format!("<-[{}]-", inner),
            Direction::Undirected => format!("-[{}]-", inner),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pattern {
    start: NodePattern,
    hops: Vec<(RelationshipPattern, NodePattern)>,
}

impl Pattern {
    pub fn new(start: NodePattern) -> Self {
        Pattern {
            start,
            hops: Vec::new(),
        }
    }

    pub fn related(mut self, relationship: RelationshipPattern, end: NodePattern) -> Self {
        self.hops.push((relationship, end));
        self
    }

    /// Variables this pattern introduces, in order of appearance.
    pub fn variables(&self) -> Vec<&Variable> {
        let mut variables = Vec::new();
        variables.extend(self.start.variable.as_ref());
        for (relationship, node) in &self.hops {
            variables.extend(relationship.variable.as_ref());
            variables.extend(node.variable.as_ref());
        }
        variables
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        let mut text = self.start.render(ctx)?;
        for (relationship, node) in &self.hops {
            text.push_str(&relationship.render(ctx));
            text.push_str(&node.render(ctx)?);
        }
        Ok(text)
    }
}

impl From<NodePattern> for Pattern {
    fn from(node: NodePattern) -> Self {
        Pattern::new(node)
    }
}
