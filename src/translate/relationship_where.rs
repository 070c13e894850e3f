//! Relationship and connection filters.
//!
//! Both lower to correlated pattern checks against the related node:
//!
//! | quantifier     | Cypher                                                          |
//! |----------------|-----------------------------------------------------------------|
//! | `SOME` / none  | `EXISTS { MATCH p WHERE f }`                                    |
//! | `NONE` / `NOT` | `NOT EXISTS { MATCH p WHERE f }`                                |
//! | `ALL`          | `EXISTS { MATCH p }` and `NOT EXISTS { MATCH p WHERE NOT (f) }` |
//! | `SINGLE`       | `single(v IN [p WHERE f \| 1] WHERE true)`                      |

use serde_json::Value;

use super::errors::{KeyPath, WhereCompileError};
use super::where_key::LogicalOperator;
use super::where_predicate::{
    combine, compile_where, expect_list_of_objects, expect_object, CompileContext,
};
use crate::cypher_builder::expr::{Expr, PatternComprehension};
use crate::cypher_builder::predicate::{and, exists, not, single, Predicate};
use crate::cypher_builder::{Match, NodePattern, Pattern, RelationshipPattern, Variable};
use crate::graph_catalog::{FieldDescriptor, NodeDescriptor, RelationshipField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Some,
    None,
    All,
    Single,
}

impl Quantifier {
    /// `NOT` is the older spelling of `NONE`.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "SOME" => Some(Quantifier::Some),
            "NONE" | "NOT" => Some(Quantifier::None),
            "ALL" => Some(Quantifier::All),
            "SINGLE" => Some(Quantifier::Single),
            _ => None,
        }
    }
}

/// `(source)-[rel:TYPE]-(related:Label)` with the direction of the field.
pub(crate) fn related_pattern(
    source: &Variable,
    rel: &RelationshipField,
    rel_variable: Option<&Variable>,
    related: &Variable,
) -> Pattern {
    let relationship = match rel_variable {
        Some(variable) => RelationshipPattern::new(variable, rel.direction),
        None => RelationshipPattern::anonymous(rel.rel_type.clone(), rel.direction),
    };
    Pattern::new(NodePattern::new(source).without_labels())
        .related(relationship, NodePattern::new(related))
}

fn quantify(
    quantifier: Quantifier,
    pattern: impl Fn() -> Pattern,
    inner: Option<Predicate>,
) -> Predicate {
    match quantifier {
        Quantifier::Some => exists(Match::new(pattern()).with_where(inner)),
        Quantifier::None => not(exists(Match::new(pattern()).with_where(inner))),
        Quantifier::All => match inner {
            None => exists(Match::new(pattern())),
            Some(inner) => Predicate::And(vec![
                exists(Match::new(pattern())),
                not(exists(Match::new(pattern()).with_where(not(inner)))),
            ]),
        },
        Quantifier::Single => single(
            &Variable::value(),
            PatternComprehension::new(pattern(), inner, Expr::literal(1)),
            None,
        ),
    }
}

/// `rel: null` asks for no related node, `rel_NOT: null` for at least one.
fn null_filter(quantifier: Quantifier, pattern: Pattern) -> Predicate {
    let any_related = exists(Match::new(pattern));
    match quantifier {
        Quantifier::None => any_related,
        _ => not(any_related),
    }
}

fn target_node<'a>(
    rel: &RelationshipField,
    ctx: &CompileContext<'a>,
) -> Result<&'a NodeDescriptor, WhereCompileError> {
    Ok(ctx.schema.node(&rel.target)?)
}

pub(crate) fn create_relationship_predicate(
    target: &Variable,
    rel: &RelationshipField,
    quantifier: Quantifier,
    value: &Value,
    ctx: &CompileContext<'_>,
    path: &KeyPath,
) -> Result<Option<Predicate>, WhereCompileError> {
    let node = target_node(rel, ctx)?;
    let related = Variable::node(node.labels.iter().cloned());
    if value.is_null() {
        return Ok(Some(null_filter(
            quantifier,
            related_pattern(target, rel, None, &related),
        )));
    }
    let inner = compile_where(&related, value, node, ctx, path)?;
    Ok(Some(quantify(
        quantifier,
        || related_pattern(target, rel, None, &related),
        inner,
    )))
}

pub(crate) fn create_connection_predicate(
    target: &Variable,
    field: &FieldDescriptor,
    rel: &RelationshipField,
    quantifier: Quantifier,
    value: &Value,
    ctx: &CompileContext<'_>,
    path: &KeyPath,
) -> Result<Option<Predicate>, WhereCompileError> {
    let node = target_node(rel, ctx)?;
    let related = Variable::node(node.labels.iter().cloned());
    let edge = Variable::relationship(rel.rel_type.clone());
    if value.is_null() {
        return Ok(Some(null_filter(
            quantifier,
            related_pattern(target, rel, Some(&edge), &related),
        )));
    }
    let connection = Connection {
        field,
        rel,
        node,
        related: &related,
        edge: &edge,
    };
    let inner = connection.compile(value, ctx, path)?;
    Ok(Some(quantify(
        quantifier,
        || related_pattern(target, rel, Some(&edge), &related),
        inner,
    )))
}

/// `node`/`edge` filter of a connection selection over an already matched
/// `(source)-[edge]-(related)` pattern.
pub(crate) fn create_connection_where(
    field: &FieldDescriptor,
    rel: &RelationshipField,
    edge: &Variable,
    related: &Variable,
    value: &Value,
    ctx: &CompileContext<'_>,
    path: &KeyPath,
) -> Result<Option<Predicate>, WhereCompileError> {
    let connection = Connection {
        field,
        rel,
        node: target_node(rel, ctx)?,
        related,
        edge,
    };
    connection.compile(value, ctx, path)
}

struct Connection<'a> {
    field: &'a FieldDescriptor,
    rel: &'a RelationshipField,
    node: &'a NodeDescriptor,
    related: &'a Variable,
    edge: &'a Variable,
}

impl Connection<'_> {
    fn compile(
        &self,
        value: &Value,
        ctx: &CompileContext<'_>,
        path: &KeyPath,
    ) -> Result<Option<Predicate>, WhereCompileError> {
        ctx.check_depth(path)?;
        let entries = expect_object(value, path)?;
        let mut predicates = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key_path = path.key(key);
            let predicate = match key.as_str() {
                "AND" | "OR" => {
                    let items = expect_list_of_objects(value, &key_path)?;
                    let mut nested = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        nested.push(self.compile(item, ctx, &key_path.index(index))?);
                    }
                    let operator = if key == "OR" {
                        LogicalOperator::Or
                    } else {
                        LogicalOperator::And
                    };
                    combine(operator, nested)
                }
                "node" => compile_where(self.related, value, self.node, ctx, &key_path)?,
                "node_NOT" => {
                    compile_where(self.related, value, self.node, ctx, &key_path)?.map(not)
                }
                "edge" => compile_where(self.edge, value, self.rel, ctx, &key_path)?,
                "edge_NOT" => compile_where(self.edge, value, self.rel, ctx, &key_path)?.map(not),
                _ => {
                    return Err(WhereCompileError::UnknownField {
                        path: key_path,
                        element: format!("{}Connection", self.field.name),
                        field: key.clone(),
                    })
                }
            };
            predicates.push(predicate);
        }
        Ok(and(predicates))
    }
}
