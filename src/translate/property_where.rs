//! Per-key dispatch and scalar comparisons.

use serde_json::Value;

use super::aggregate_where::create_aggregate_predicate;
use super::errors::{value_kind, KeyPath, WhereCompileError};
use super::relationship_where::{
    create_connection_predicate, create_relationship_predicate, Quantifier,
};
use super::where_key::{parse_where_key, KeyMarker, WhereKey};
use super::where_predicate::CompileContext;
use crate::cypher_builder::expr::Expr;
use crate::cypher_builder::predicate::{
    contains, ends_with, eq, gt, gte, in_list, is_not_null, is_null, lt, lte, matches, not,
    starts_with, Predicate,
};
use crate::cypher_builder::Variable;
use crate::graph_catalog::{FieldDescriptor, FieldKind, FilterOperator, GraphElement};

/// Compile one `key: value` entry that names a field of `element`.
pub(crate) fn create_property_where(
    key: &str,
    value: &Value,
    target: &Variable,
    element: &dyn GraphElement,
    ctx: &CompileContext<'_>,
    path: &KeyPath,
) -> Result<Option<Predicate>, WhereCompileError> {
    let (parsed, field) = resolve_key(key, element).ok_or_else(|| {
        WhereCompileError::UnknownField {
            path: path.clone(),
            element: element.element_name().to_string(),
            field: key.to_string(),
        }
    })?;
    log::trace!(
        "Where key `{}` resolved to field `{}` (marker {:?}, operator {:?})",
        key,
        field.name,
        parsed.marker,
        parsed.operator
    );

    match (&field.kind, parsed.marker) {
        (FieldKind::Scalar(_), None) => {
            create_scalar_predicate(target, field, parsed.operator, value, path).map(Some)
        }
        (FieldKind::Relationship(rel), None) => {
            let quantifier = quantifier_for(field, parsed.operator, path)?;
            create_relationship_predicate(target, rel, quantifier, value, ctx, path)
        }
        (FieldKind::Relationship(rel), Some(KeyMarker::Connection)) => {
            let quantifier = quantifier_for(field, parsed.operator, path)?;
            create_connection_predicate(target, field, rel, quantifier, value, ctx, path)
        }
        (FieldKind::Relationship(rel), Some(KeyMarker::Aggregate)) => match parsed.operator {
            None => create_aggregate_predicate(target, field, rel, value, ctx, path),
            Some(operator) => Err(unsupported(field, operator, path)),
        },
        (FieldKind::Scalar(_), Some(_)) => Err(WhereCompileError::UnknownField {
            path: path.clone(),
            element: element.element_name().to_string(),
            field: key.to_string(),
        }),
    }
}

/// First reading of `key` whose field exists on `element`.
fn resolve_key<'k, 'e>(
    key: &'k str,
    element: &'e dyn GraphElement,
) -> Option<(WhereKey<'k>, &'e FieldDescriptor)> {
    parse_where_key(key).into_iter().find_map(|reading| {
        let field = element.find_field(reading.field)?;
        match (&field.kind, reading.marker) {
            (FieldKind::Scalar(_), Some(_)) => None,
            _ => Some((reading, field)),
        }
    })
}

fn quantifier_for(
    field: &FieldDescriptor,
    operator: Option<&str>,
    path: &KeyPath,
) -> Result<Quantifier, WhereCompileError> {
    match operator {
        None => Ok(Quantifier::Some),
        Some(operator) => {
            Quantifier::from_suffix(operator).ok_or_else(|| unsupported(field, operator, path))
        }
    }
}

fn unsupported(field: &FieldDescriptor, operator: &str, path: &KeyPath) -> WhereCompileError {
    WhereCompileError::UnsupportedOperator {
        path: path.clone(),
        field: field.name.clone(),
        operator: operator.to_string(),
    }
}

fn is_negated(operator: FilterOperator) -> bool {
    matches!(
        operator,
        FilterOperator::Not
            | FilterOperator::NotIn
            | FilterOperator::NotContains
            | FilterOperator::NotStartsWith
            | FilterOperator::NotEndsWith
            | FilterOperator::NotIncludes
    )
}

/// `target.property <op> $param`, or `IS [NOT] NULL` for a null value.
pub(crate) fn create_scalar_predicate(
    target: &Variable,
    field: &FieldDescriptor,
    operator: Option<&str>,
    value: &Value,
    path: &KeyPath,
) -> Result<Predicate, WhereCompileError> {
    let operator = match operator {
        None => None,
        Some(suffix) => match FilterOperator::from_suffix(suffix) {
            Some(op) if field.allows(op) => Some(op),
            _ => return Err(unsupported(field, suffix, path)),
        },
    };
    let property = target.property(field.property_name());

    if value.is_null() {
        return Ok(match operator {
            Some(op) if is_negated(op) => is_not_null(property),
            _ => is_null(property),
        });
    }

    if matches!(operator, Some(FilterOperator::In | FilterOperator::NotIn)) && !value.is_array() {
        return Err(WhereCompileError::InvalidValueShape {
            path: path.clone(),
            expected: "a list",
            found: value_kind(value),
        });
    }

    let param = Expr::param(value.clone());
    let predicate = match operator {
        None => eq(property, param),
        Some(FilterOperator::Not) => not(eq(property, param)),
        Some(FilterOperator::In) => in_list(property, param),
        Some(FilterOperator::NotIn) => not(in_list(property, param)),
        Some(FilterOperator::Lt) => lt(property, param),
        Some(FilterOperator::Lte) => lte(property, param),
        Some(FilterOperator::Gt) => gt(property, param),
        Some(FilterOperator::Gte) => gte(property, param),
        Some(FilterOperator::Contains) => contains(property, param),
        Some(FilterOperator::NotContains) => not(contains(property, param)),
        Some(FilterOperator::StartsWith) => starts_with(property, param),
        Some(FilterOperator::NotStartsWith) => not(starts_with(property, param)),
        Some(FilterOperator::EndsWith) => ends_with(property, param),
        Some(FilterOperator::NotEndsWith) => not(ends_with(property, param)),
        Some(FilterOperator::Matches) => matches(property, param),
        Some(FilterOperator::Includes) => in_list(param, property),
        Some(FilterOperator::NotIncludes) => not(in_list(param, property)),
    };
    Ok(predicate)
}
