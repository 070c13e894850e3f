//! Read query translation.
//!
//! Turns a [`ReadRequest`] against a node descriptor into a complete query:
//! the root `MATCH`, its compiled `WHERE`, optional sorting and pagination,
//! one `CALL` subquery per selected relationship or connection (recursively)
//! and a final map projection.
//!
//! A connection selection returns `{ edges, totalCount }`, where every edge
//! is a map of the selected relationship properties plus the related `node`:
//!
//! ```text
//! WITH { role: this0_this0.role, node: this0_this1 { .name } } AS this0_var0
//! WITH collect(this0_var0) AS this0_var1
//! RETURN { edges: this0_var1, totalCount: size(this0_var1) } AS this0_var2
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{KeyPath, TranslateError};
use super::relationship_where::{create_connection_where, related_pattern};
use super::where_predicate::{create_where_predicate_at, CompileContext};
use crate::config::BuilderConfig;
use crate::cypher_builder::expr::{collect, head, size, Expr};
use crate::cypher_builder::{
    build, Call, ChainClauses, CypherResult, Match, MapProjection, NodePattern, OrderBy,
    ProjectionItem, RenderOptions, Return, SortDirection, Variable, With,
};
use crate::graph_catalog::{FieldDescriptor, GraphSchema, NodeDescriptor, RelationshipField};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadRequest {
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_input: Option<Value>,
    pub sort: Vec<SortField>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    /// Scalar fields projected as `.field`
    pub fields: Vec<String>,
    pub relationships: Vec<RelationshipSelection>,
    pub connections: Vec<ConnectionSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSelection {
    pub field: String,
    /// Key in the parent projection; defaults to the field name
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(flatten)]
    pub request: ReadRequest,
}

/// `<field>Connection { edges { <edge_fields> node { ... } } totalCount }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSelection {
    pub field: String,
    /// Key in the parent projection; defaults to `<field>Connection`
    #[serde(default)]
    pub alias: Option<String>,
    /// Connection filter with `node`, `edge`, `AND` and `OR` keys
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_input: Option<Value>,
    #[serde(default)]
    pub sort: Vec<ConnectionSortField>,
    /// Relationship properties projected next to `node`
    #[serde(default)]
    pub edge_fields: Vec<String>,
    #[serde(default)]
    pub node: Selection,
}

/// Which side of a connection edge a sort key is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortTarget {
    #[default]
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSortField {
    #[serde(default)]
    pub on: SortTarget,
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Translate a read of `node_name` into Cypher text and parameters.
pub fn translate_read(
    schema: &GraphSchema,
    node_name: &str,
    request: &ReadRequest,
    config: &BuilderConfig,
) -> Result<CypherResult, TranslateError> {
    let node = schema.node(node_name)?;
    let ctx = CompileContext::new(schema, config);
    let this = Variable::named_node(config.variable_prefix.clone(), node.labels.iter().cloned());

    let mut root = Match::new(NodePattern::new(&this));
    let projection = apply_request(&mut root, &this, node, request, &ctx, node_name)?;
    root.returning(Return::new(vec![ProjectionItem::aliased(projection, &this)]));

    let result = build(&root.into(), &RenderOptions::from(config))?;
    log::debug!(
        "Translated read of `{}` with {} relationship and {} connection selections",
        node_name,
        request.selection.relationships.len(),
        request.selection.connections.len()
    );
    Ok(result)
}

/// Attach filter, ordering, pagination and relationship subqueries of
/// `request` to `clause`, and return the projection of `variable`.
fn apply_request(
    clause: &mut Match,
    variable: &Variable,
    node: &NodeDescriptor,
    request: &ReadRequest,
    ctx: &CompileContext<'_>,
    path: &str,
) -> Result<MapProjection, TranslateError> {
    if let Some(where_input) = &request.where_input {
        let where_path = KeyPath::at(format!("{}.where", path));
        clause.and_where(create_where_predicate_at(
            variable,
            where_input,
            node,
            ctx,
            &where_path,
        )?);
    }

    if !request.sort.is_empty() || request.offset.is_some() || request.limit.is_some() {
        let mut page = With::all();
        if !request.sort.is_empty() {
            let mut order = OrderBy::new();
            for (index, sort) in request.sort.iter().enumerate() {
                let field = scalar_field(node, &sort.field).ok_or_else(|| {
                    TranslateError::UnknownSortField {
                        path: format!("{}.sort[{}]", path, index),
                        element: node.name.clone(),
                        field: sort.field.clone(),
                    }
                })?;
                order = order.by(variable.property(field.property_name()), sort.direction);
            }
            page.order_by(order);
        }
        if let Some(offset) = request.offset {
            page.skip(offset);
        }
        if let Some(limit) = request.limit {
            page.limit(limit);
        }
        clause.with(page);
    }

    project_selection(clause, variable, node, &request.selection, ctx, path)
}

/// Map projection of `selection`; relationship and connection fields add
/// their `CALL` subqueries to `clause`.
fn project_selection(
    clause: &mut Match,
    variable: &Variable,
    node: &NodeDescriptor,
    selection: &Selection,
    ctx: &CompileContext<'_>,
    path: &str,
) -> Result<MapProjection, TranslateError> {
    let mut projection = MapProjection::new(variable);
    for name in &selection.fields {
        let field = scalar_field(node, name).ok_or_else(|| TranslateError::UnknownSelectionField {
            path: format!("{}.{}", path, name),
            element: node.name.clone(),
            field: name.clone(),
        })?;
        projection = if field.property_name() == field.name {
            projection.property(field.name.clone())
        } else {
            projection.entry(field.name.clone(), variable.property(field.property_name()))
        };
    }

    for selection in &selection.relationships {
        let selection_path = format!("{}.{}", path, selection.field);
        let (_, rel) = relationship(node, &selection.field, &selection_path)?;
        let (call, result) = relationship_subquery(variable, rel, selection, ctx, &selection_path)?;
        clause.call(call);
        let key = selection.alias.as_ref().unwrap_or(&selection.field).clone();
        projection = projection.entry(key, &result);
    }

    for selection in &selection.connections {
        let key = selection
            .alias
            .clone()
            .unwrap_or_else(|| format!("{}Connection", selection.field));
        let selection_path = format!("{}.{}Connection", path, selection.field);
        let (field, rel) = relationship(node, &selection.field, &selection_path)?;
        let (call, result) =
            connection_subquery(variable, field, rel, selection, ctx, &selection_path)?;
        clause.call(call);
        projection = projection.entry(key, &result);
    }

    Ok(projection)
}

fn scalar_field<'n>(node: &'n NodeDescriptor, name: &str) -> Option<&'n FieldDescriptor> {
    node.field(name).filter(|field| field.as_scalar().is_some())
}

fn relationship<'n>(
    node: &'n NodeDescriptor,
    name: &str,
    path: &str,
) -> Result<(&'n FieldDescriptor, &'n RelationshipField), TranslateError> {
    node.field(name)
        .and_then(|field| Some((field, field.as_relationship()?)))
        .ok_or_else(|| TranslateError::UnknownSelectionField {
            path: path.to_string(),
            element: node.name.clone(),
            field: name.to_string(),
        })
}

/// `CALL { WITH parent MATCH ... RETURN collect(related { ... }) AS varN }`
fn relationship_subquery(
    parent: &Variable,
    rel: &RelationshipField,
    selection: &RelationshipSelection,
    ctx: &CompileContext<'_>,
    path: &str,
) -> Result<(Call, Variable), TranslateError> {
    let node = ctx.schema.node(&rel.target)?;
    let related = Variable::node(node.labels.iter().cloned());
    let edge = Variable::relationship(rel.rel_type.clone());

    let mut subquery = Match::new(related_pattern(parent, rel, Some(&edge), &related));
    let projection = apply_request(&mut subquery, &related, node, &selection.request, ctx, path)?;
    subquery.with(With::new(vec![ProjectionItem::aliased(projection, &related)]));

    let result = Variable::value();
    let collected = if rel.is_list {
        collect(&related)
    } else {
        head(collect(&related))
    };
    subquery.returning(Return::new(vec![ProjectionItem::aliased(collected, &result)]));

    Ok((Call::new(subquery).import(parent), result))
}

/// `CALL { WITH parent MATCH ... RETURN { edges, totalCount } AS varN }`
fn connection_subquery(
    parent: &Variable,
    field: &FieldDescriptor,
    rel: &RelationshipField,
    selection: &ConnectionSelection,
    ctx: &CompileContext<'_>,
    path: &str,
) -> Result<(Call, Variable), TranslateError> {
    let node = ctx.schema.node(&rel.target)?;
    let related = Variable::node(node.labels.iter().cloned());
    let edge = Variable::relationship(rel.rel_type.clone());

    let mut subquery = Match::new(related_pattern(parent, rel, Some(&edge), &related));
    if let Some(where_input) = &selection.where_input {
        let where_path = KeyPath::at(format!("{}.where", path));
        subquery.and_where(create_connection_where(
            field,
            rel,
            &edge,
            &related,
            where_input,
            ctx,
            &where_path,
        )?);
    }

    let node_projection = project_selection(&mut subquery, &related, node, &selection.node, ctx, path)?;

    // Sorted after the nested subqueries so their rows keep this order.
    if !selection.sort.is_empty() {
        let mut order = OrderBy::new();
        for (index, sort) in selection.sort.iter().enumerate() {
            let (variable, found, element) = match sort.on {
                SortTarget::Node => (&related, scalar_field(node, &sort.field), node.name.clone()),
                SortTarget::Edge => (
                    &edge,
                    rel.property(&sort.field),
                    format!("{}Connection.edge", field.name),
                ),
            };
            let sort_field = found.ok_or_else(|| TranslateError::UnknownSortField {
                path: format!("{}.sort[{}]", path, index),
                element,
                field: sort.field.clone(),
            })?;
            order = order.by(variable.property(sort_field.property_name()), sort.direction);
        }
        let mut page = With::all();
        page.order_by(order);
        subquery.with(page);
    }

    let mut entries = Vec::with_capacity(selection.edge_fields.len() + 1);
    for name in &selection.edge_fields {
        let property = rel
            .property(name)
            .ok_or_else(|| TranslateError::UnknownSelectionField {
                path: format!("{}.edges.{}", path, name),
                element: format!("{}Connection.edge", field.name),
                field: name.clone(),
            })?;
        entries.push((name.clone(), Expr::from(edge.property(property.property_name()))));
    }
    entries.push(("node".to_string(), node_projection.into()));

    let edge_map = Variable::value();
    let edges = Variable::value();
    let result = Variable::value();
    subquery.with(With::new(vec![ProjectionItem::aliased(Expr::map(entries), &edge_map)]));
    subquery.with(With::new(vec![ProjectionItem::aliased(collect(&edge_map), &edges)]));
    subquery.returning(Return::new(vec![ProjectionItem::aliased(
        Expr::map([("edges", Expr::from(&edges)), ("totalCount", size(&edges))]),
        &result,
    )]));

    Ok((Call::new(subquery).import(parent), result))
}
