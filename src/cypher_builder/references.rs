//! Handles for the graph elements and literal values a query mentions.
//!
//! A [`Variable`] or [`Param`] is identified by reference: cloning the handle
//! refers to the same element, and it is rendered with the same generated name
//! everywhere within one build. Names are assigned lazily by the
//! [`RenderContext`](super::context::RenderContext) on first render.

use serde_json::Value;
use std::rc::Rc;

use super::expr::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Node,
    Relationship,
    Value,
}

#[derive(Debug)]
struct VariableData {
    kind: VariableKind,
    name: Option<String>,
    labels: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Variable(Rc<VariableData>);

impl Variable {
    fn create(kind: VariableKind, name: Option<String>, labels: Vec<String>) -> Self {
        Variable(Rc::new(VariableData { kind, name, labels }))
    }

    /// A node whose alias is generated at render time.
    pub fn node<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::create(
            VariableKind::Node,
            None,
            labels.into_iter().map(Into::into).collect(),
        )
    }

    /// A node rendered under a fixed name, e.g. `this`.
    pub fn named_node<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::create(
            VariableKind::Node,
            Some(name.into()),
            labels.into_iter().map(Into::into).collect(),
        )
    }

    pub fn relationship(rel_type: impl Into<String>) -> Self {
        Self::create(VariableKind::Relationship, None, vec![rel_type.into()])
    }

    /// A plain value alias (`var0`), typically an aggregation or subquery result.
    pub fn value() -> Self {
        Self::create(VariableKind::Value, None, Vec::new())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::create(VariableKind::Value, Some(name.into()), Vec::new())
    }

    pub fn kind(&self) -> VariableKind {
        self.0.kind
    }

    /// Fixed name, if the variable was created with one.
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn labels(&self) -> &[String] {
        &self.0.labels
    }

    pub fn rel_type(&self) -> Option<&str> {
        match self.0.kind {
            VariableKind::Relationship => self.0.labels.first().map(String::as_str),
            _ => None,
        }
    }

    pub fn property(&self, key: impl Into<String>) -> Expr {
        Expr::Property(PropertyRef::new(self, key))
    }

    pub fn same_as(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

/// `variable.key[.key...]`
#[derive(Debug, Clone)]
pub struct PropertyRef {
    variable: Variable,
    path: Vec<String>,
}

impl PropertyRef {
    pub fn new(variable: &Variable, key: impl Into<String>) -> Self {
        PropertyRef {
            variable: variable.clone(),
            path: vec![key.into()],
        }
    }

    pub fn property(mut self, key: impl Into<String>) -> Self {
        self.path.push(key.into());
        self
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }
}

#[derive(Debug)]
struct ParamData {
    value: Value,
}

/// A literal bound through the parameter table, rendered as `$name`.
#[derive(Debug, Clone)]
pub struct Param(Rc<ParamData>);

impl Param {
    pub fn new(value: impl Into<Value>) -> Self {
        Param(Rc::new(ParamData {
            value: value.into(),
        }))
    }

    pub fn value(&self) -> &Value {
        &self.0.value
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}
