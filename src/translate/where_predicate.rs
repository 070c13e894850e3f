//! Entry point of the where compiler.
//!
//! Lowers a where input object into a [`Predicate`] over a target variable:
//! `AND`/`OR` keys recurse, every other key is dispatched on the kind of
//! field it names, and the per-key results are AND-ed together.

use serde_json::{Map, Value};

use super::errors::{value_kind, KeyPath, WhereCompileError};
use super::property_where::create_property_where;
use super::where_key::LogicalOperator;
use crate::config::BuilderConfig;
use crate::cypher_builder::predicate::{and, or, Predicate};
use crate::cypher_builder::Variable;
use crate::graph_catalog::{GraphElement, GraphSchema};

/// Descriptors and limits shared by one compilation.
#[derive(Debug, Clone, Copy)]
pub struct CompileContext<'a> {
    pub schema: &'a GraphSchema,
    pub max_depth: usize,
}

impl<'a> CompileContext<'a> {
    pub fn new(schema: &'a GraphSchema, config: &BuilderConfig) -> Self {
        CompileContext {
            schema,
            max_depth: config.max_filter_depth,
        }
    }

    pub(crate) fn check_depth(&self, path: &KeyPath) -> Result<(), WhereCompileError> {
        if path.depth() > self.max_depth {
            return Err(WhereCompileError::NestingTooDeep {
                path: path.clone(),
                limit: self.max_depth,
            });
        }
        Ok(())
    }
}

/// Compile `where_input` into a predicate over `target`.
///
/// Returns `Ok(None)` when the input filters nothing (`{}`, empty `AND`
/// lists); the caller then omits its `WHERE`.
pub fn create_where_predicate(
    target: &Variable,
    where_input: &Value,
    element: &dyn GraphElement,
    ctx: &CompileContext<'_>,
) -> Result<Option<Predicate>, WhereCompileError> {
    create_where_predicate_at(target, where_input, element, ctx, &KeyPath::root())
}

/// As [`create_where_predicate`], reporting errors relative to `path`.
pub(crate) fn create_where_predicate_at(
    target: &Variable,
    where_input: &Value,
    element: &dyn GraphElement,
    ctx: &CompileContext<'_>,
    path: &KeyPath,
) -> Result<Option<Predicate>, WhereCompileError> {
    log::debug!(
        "Compiling where input for `{}` at `{}` ({} keys)",
        element.element_name(),
        path,
        where_input.as_object().map_or(0, Map::len)
    );
    compile_where(target, where_input, element, ctx, path)
}

pub(crate) fn compile_where(
    target: &Variable,
    input: &Value,
    element: &dyn GraphElement,
    ctx: &CompileContext<'_>,
    path: &KeyPath,
) -> Result<Option<Predicate>, WhereCompileError> {
    ctx.check_depth(path)?;
    let entries = expect_object(input, path)?;
    let mut predicates = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let key_path = path.key(key);
        let predicate = match LogicalOperator::from_key(key) {
            Some(operator) => {
                let items = expect_list_of_objects(value, &key_path)?;
                let mut nested = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    nested.push(compile_where(
                        target,
                        item,
                        element,
                        ctx,
                        &key_path.index(index),
                    )?);
                }
                combine(operator, nested)
            }
            None => create_property_where(key, value, target, element, ctx, &key_path)?,
        };
        predicates.push(predicate);
    }
    Ok(and(predicates))
}

pub(crate) fn combine(operator: LogicalOperator, predicates: Vec<Option<Predicate>>) -> Option<Predicate> {
    match operator {
        LogicalOperator::And => and(predicates),
        LogicalOperator::Or => or(predicates),
    }
}

pub(crate) fn expect_object<'v>(
    value: &'v Value,
    path: &KeyPath,
) -> Result<&'v Map<String, Value>, WhereCompileError> {
    value
        .as_object()
        .ok_or_else(|| WhereCompileError::InvalidValueShape {
            path: path.clone(),
            expected: "an object",
            found: value_kind(value),
        })
}

pub(crate) fn expect_list_of_objects<'v>(
    value: &'v Value,
    path: &KeyPath,
) -> Result<&'v Vec<Value>, WhereCompileError> {
    let items = value
        .as_array()
        .ok_or_else(|| WhereCompileError::InvalidValueShape {
            path: path.clone(),
            expected: "a list of objects",
            found: value_kind(value),
        })?;
    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            return Err(WhereCompileError::InvalidValueShape {
                path: path.index(index),
                expected: "an object",
                found: value_kind(item),
            });
        }
    }
    Ok(items)
}
