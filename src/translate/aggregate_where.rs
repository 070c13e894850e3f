//! Aggregation filters (`actorsAggregate: { count_GT: 2, node: { name_SHORTEST_LENGTH_LT: 5 } }`).
//!
//! Every aggregate the input mentions becomes one `WITH <aggregate> AS varN`
//! item of a correlated subquery, and the comparisons on those aliases become
//! its `WHERE`:
//!
//! ```text
//! EXISTS {
//!     MATCH (this)<-[this0:ACTED_IN]-(this1:Actor)
//!     WITH count(this1) AS var0
//!     WHERE var0 > $param0
//! }
//! ```

use serde_json::Value;

use super::errors::{KeyPath, WhereCompileError};
use super::relationship_where::related_pattern;
use super::where_key::{parse_aggregate_key, parse_count_key, AggregateFunction, LogicalOperator};
use super::where_predicate::{combine, expect_list_of_objects, expect_object, CompileContext};
use crate::cypher_builder::expr::{avg, count, max, min, size, sum, Expr};
use crate::cypher_builder::predicate::{and, compare, exists, ComparisonOperator, Predicate};
use crate::cypher_builder::{ChainClauses, Match, ProjectionItem, Variable, With};
use crate::graph_catalog::{FieldDescriptor, GraphElement, NodeDescriptor, RelationshipField};

pub(crate) fn create_aggregate_predicate(
    target: &Variable,
    field: &FieldDescriptor,
    rel: &RelationshipField,
    value: &Value,
    ctx: &CompileContext<'_>,
    path: &KeyPath,
) -> Result<Option<Predicate>, WhereCompileError> {
    let node = ctx.schema.node(&rel.target)?;
    let related = Variable::node(node.labels.iter().cloned());
    let edge = Variable::relationship(rel.rel_type.clone());

    let mut aggregation = Aggregation {
        field,
        rel,
        node,
        related: &related,
        edge: &edge,
        items: Vec::new(),
    };
    let Some(predicate) = aggregation.compile(value, ctx, path)? else {
        return Ok(None);
    };

    let mut projection = With::new(aggregation.items);
    projection.and_where(predicate);
    let mut subquery = Match::new(related_pattern(target, rel, Some(&edge), &related));
    subquery.with(projection);
    Ok(Some(exists(subquery)))
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Node,
    Edge,
}

struct Aggregation<'a> {
    field: &'a FieldDescriptor,
    rel: &'a RelationshipField,
    node: &'a NodeDescriptor,
    related: &'a Variable,
    edge: &'a Variable,
    items: Vec<ProjectionItem>,
}

impl Aggregation<'_> {
    fn element_name(&self) -> String {
        format!("{}Aggregate", self.field.name)
    }

    /// Bind `aggregate` to a fresh alias and compare the alias with `value`.
    fn aggregate(
        &mut self,
        aggregate: Expr,
        operator: ComparisonOperator,
        value: &Value,
    ) -> Predicate {
        let alias = Variable::value();
        self.items.push(ProjectionItem::aliased(aggregate, &alias));
        compare(operator, &alias, Expr::param(value.clone()))
    }

    fn compile(
        &mut self,
        value: &Value,
        ctx: &CompileContext<'_>,
        path: &KeyPath,
    ) -> Result<Option<Predicate>, WhereCompileError> {
        ctx.check_depth(path)?;
        let entries = expect_object(value, path)?;
        let mut predicates = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key_path = path.key(key);
            let predicate = if let Some(operator) = LogicalOperator::from_key(key) {
                let items = expect_list_of_objects(value, &key_path)?;
                let mut nested = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    nested.push(self.compile(item, ctx, &key_path.index(index))?);
                }
                combine(operator, nested)
            } else if key == "node" {
                self.compile_fields(Side::Node, value, ctx, &key_path)?
            } else if key == "edge" {
                self.compile_fields(Side::Edge, value, ctx, &key_path)?
            } else if let Some(operator) = parse_count_key(key) {
                let related = self.related.clone();
                Some(self.aggregate(count(&related), operator, value))
            } else {
                return Err(WhereCompileError::UnknownField {
                    path: key_path,
                    element: self.element_name(),
                    field: key.clone(),
                });
            };
            predicates.push(predicate);
        }
        Ok(and(predicates))
    }

    fn compile_fields(
        &mut self,
        side: Side,
        value: &Value,
        ctx: &CompileContext<'_>,
        path: &KeyPath,
    ) -> Result<Option<Predicate>, WhereCompileError> {
        ctx.check_depth(path)?;
        let entries = expect_object(value, path)?;
        let mut predicates = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key_path = path.key(key);
            if let Some(operator) = LogicalOperator::from_key(key) {
                let items = expect_list_of_objects(value, &key_path)?;
                let mut nested = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    nested.push(self.compile_fields(side, item, ctx, &key_path.index(index))?);
                }
                predicates.push(combine(operator, nested));
                continue;
            }

            let (variable, element): (&Variable, &dyn GraphElement) = match side {
                Side::Node => (self.related, self.node),
                Side::Edge => (self.edge, self.rel),
            };
            let unknown = || WhereCompileError::UnknownField {
                path: key_path.clone(),
                element: element.element_name().to_string(),
                field: key.clone(),
            };
            let parsed = parse_aggregate_key(key).ok_or_else(unknown)?;
            let field = element.find_field(parsed.field).ok_or_else(unknown)?;
            let scalar = field.as_scalar().ok_or_else(unknown)?;

            let supported = match parsed.function {
                AggregateFunction::Average | AggregateFunction::Sum => {
                    scalar.scalar_type.is_numeric()
                }
                AggregateFunction::Min | AggregateFunction::Max => {
                    scalar.scalar_type.is_orderable() && !scalar.scalar_type.is_string_like()
                }
                AggregateFunction::ShortestLength
                | AggregateFunction::LongestLength
                | AggregateFunction::AverageLength => scalar.scalar_type.is_string_like(),
            };
            if !supported || scalar.is_list {
                return Err(WhereCompileError::UnsupportedOperator {
                    path: key_path,
                    field: field.name.clone(),
                    operator: key[parsed.field.len() + 1..].to_string(),
                });
            }

            let property = variable.property(field.property_name());
            let aggregate = match parsed.function {
                AggregateFunction::Average => avg(property),
                AggregateFunction::Sum => sum(property),
                AggregateFunction::Min => min(property),
                AggregateFunction::Max => max(property),
                AggregateFunction::ShortestLength => min(size(property)),
                AggregateFunction::LongestLength => max(size(property)),
                AggregateFunction::AverageLength => avg(size(property)),
            };
            predicates.push(Some(self.aggregate(aggregate, parsed.operator, value)));
        }
        Ok(and(predicates))
    }
}
