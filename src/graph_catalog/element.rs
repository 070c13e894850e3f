//! Resolved element descriptors.
//!
//! A [`NodeDescriptor`] is what the where compiler and the read translator know
//! about a GraphQL type: its storage labels and, per field, whether it is a
//! scalar (with the comparison operators it accepts) or a relationship (with
//! type, direction and target node). Descriptors are trusted as given.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Traversal direction of a relationship, seen from the owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "OUT", alias = "OUTGOING")]
    Outgoing,
    #[serde(rename = "IN", alias = "INCOMING")]
    Incoming,
    #[serde(rename = "UNDIRECTED")]
    Undirected,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Incoming => f.write_str("incoming"),
            Direction::Outgoing => f.write_str("outgoing"),
            Direction::Undirected => f.write_str("undirected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    ID,
    String,
    Int,
    BigInt,
    Float,
    Boolean,
    Date,
    Time,
    LocalTime,
    DateTime,
    LocalDateTime,
    Duration,
}

impl ScalarType {
    pub fn is_string_like(self) -> bool {
        matches!(self, ScalarType::ID | ScalarType::String)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarType::Int | ScalarType::BigInt | ScalarType::Float)
    }

    pub fn is_orderable(self) -> bool {
        !matches!(self, ScalarType::Boolean)
    }
}

/// Comparison operator suffix of a where key (`title_STARTS_WITH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    Not,
    In,
    NotIn,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    Matches,
    Includes,
    NotIncludes,
}

const STRING_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Not,
    FilterOperator::In,
    FilterOperator::NotIn,
    FilterOperator::Contains,
    FilterOperator::NotContains,
    FilterOperator::StartsWith,
    FilterOperator::NotStartsWith,
    FilterOperator::EndsWith,
    FilterOperator::NotEndsWith,
    FilterOperator::Matches,
    FilterOperator::Lt,
    FilterOperator::Lte,
    FilterOperator::Gt,
    FilterOperator::Gte,
];

const ORDERED_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Not,
    FilterOperator::In,
    FilterOperator::NotIn,
    FilterOperator::Lt,
    FilterOperator::Lte,
    FilterOperator::Gt,
    FilterOperator::Gte,
];

const EQUALITY_OPERATORS: &[FilterOperator] = &[FilterOperator::Not];

const LIST_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Not,
    FilterOperator::Includes,
    FilterOperator::NotIncludes,
];

impl FilterOperator {
    /// Parse the textual suffix (without the leading underscore).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let op = match suffix {
            "NOT" => FilterOperator::Not,
            "IN" => FilterOperator::In,
            "NOT_IN" => FilterOperator::NotIn,
            "LT" => FilterOperator::Lt,
            "LTE" => FilterOperator::Lte,
            "GT" => FilterOperator::Gt,
            "GTE" => FilterOperator::Gte,
            "CONTAINS" => FilterOperator::Contains,
            "NOT_CONTAINS" => FilterOperator::NotContains,
            "STARTS_WITH" => FilterOperator::StartsWith,
            "NOT_STARTS_WITH" => FilterOperator::NotStartsWith,
            "ENDS_WITH" => FilterOperator::EndsWith,
            "NOT_ENDS_WITH" => FilterOperator::NotEndsWith,
            "MATCHES" => FilterOperator::Matches,
            "INCLUDES" => FilterOperator::Includes,
            "NOT_INCLUDES" => FilterOperator::NotIncludes,
            _ => return None,
        };
        Some(op)
    }

    pub fn suffix(self) -> &'static str {
        match self {
            FilterOperator::Not => "NOT",
            FilterOperator::In => "IN",
            FilterOperator::NotIn => "NOT_IN",
            FilterOperator::Lt => "LT",
            FilterOperator::Lte => "LTE",
            FilterOperator::Gt => "GT",
            FilterOperator::Gte => "GTE",
            FilterOperator::Contains => "CONTAINS",
            FilterOperator::NotContains => "NOT_CONTAINS",
            FilterOperator::StartsWith => "STARTS_WITH",
            FilterOperator::NotStartsWith => "NOT_STARTS_WITH",
            FilterOperator::EndsWith => "ENDS_WITH",
            FilterOperator::NotEndsWith => "NOT_ENDS_WITH",
            FilterOperator::Matches => "MATCHES",
            FilterOperator::Includes => "INCLUDES",
            FilterOperator::NotIncludes => "NOT_INCLUDES",
        }
    }

    /// Operators a scalar field accepts when its descriptor lists none.
    pub fn defaults_for(scalar_type: ScalarType, is_list: bool) -> &'static [FilterOperator] {
        if is_list {
            LIST_OPERATORS
        } else if scalar_type.is_string_like() {
            STRING_OPERATORS
        } else if scalar_type.is_orderable() {
            ORDERED_OPERATORS
        } else {
            EQUALITY_OPERATORS
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    pub scalar_type: ScalarType,
    pub is_list: bool,
    /// Explicitly allowed operators; `None` means the defaults of the type
    pub operators: Option<Vec<FilterOperator>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipField {
    pub rel_type: String,
    pub direction: Direction,
    /// Name of the target node descriptor
    pub target: String,
    pub is_list: bool,
    /// Scalar properties stored on the relationship itself
    pub properties: Vec<FieldDescriptor>,
}

impl RelationshipField {
    pub fn property(&self, name: &str) -> Option<&FieldDescriptor> {
        self.properties.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(ScalarField),
    Relationship(RelationshipField),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Storage property name when it differs from the GraphQL field name
    pub db_property: Option<String>,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn scalar(name: impl Into<String>, scalar_type: ScalarType) -> Self {
        FieldDescriptor {
            name: name.into(),
            db_property: None,
            kind: FieldKind::Scalar(ScalarField {
                scalar_type,
                is_list: false,
                operators: None,
            }),
        }
    }

    pub fn scalar_list(name: impl Into<String>, scalar_type: ScalarType) -> Self {
        FieldDescriptor {
            name: name.into(),
            db_property: None,
            kind: FieldKind::Scalar(ScalarField {
                scalar_type,
                is_list: true,
                operators: None,
            }),
        }
    }

    pub fn relationship(
        name: impl Into<String>,
        rel_type: impl Into<String>,
        direction: Direction,
        target: impl Into<String>,
    ) -> Self {
        FieldDescriptor {
            name: name.into(),
            db_property: None,
            kind: FieldKind::Relationship(RelationshipField {
                rel_type: rel_type.into(),
                direction,
                target: target.into(),
                is_list: true,
                properties: Vec::new(),
            }),
        }
    }

    pub fn with_db_property(mut self, property: impl Into<String>) -> Self {
        self.db_property = Some(property.into());
        self
    }

    pub fn with_operators(mut self, operators: Vec<FilterOperator>) -> Self {
        if let FieldKind::Scalar(scalar) = &mut self.kind {
            scalar.operators = Some(operators);
        }
        self
    }

    /// Mark a relationship field as returning a single node.
    pub fn single(mut self) -> Self {
        if let FieldKind::Relationship(rel) = &mut self.kind {
            rel.is_list = false;
        }
        self
    }

    pub fn with_edge_properties(mut self, properties: Vec<FieldDescriptor>) -> Self {
        if let FieldKind::Relationship(rel) = &mut self.kind {
            rel.properties = properties;
        }
        self
    }

    /// Name of the property in the store.
    pub fn property_name(&self) -> &str {
        self.db_property.as_deref().unwrap_or(&self.name)
    }

    pub fn as_scalar(&self) -> Option<&ScalarField> {
        match &self.kind {
            FieldKind::Scalar(scalar) => Some(scalar),
            FieldKind::Relationship(_) => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&RelationshipField> {
        match &self.kind {
            FieldKind::Relationship(rel) => Some(rel),
            FieldKind::Scalar(_) => None,
        }
    }

    /// Whether the field accepts `operator` as a where suffix.
    pub fn allows(&self, operator: FilterOperator) -> bool {
        match &self.kind {
            FieldKind::Scalar(scalar) => match &scalar.operators {
                Some(ops) => ops.contains(&operator),
                None => FilterOperator::defaults_for(scalar.scalar_type, scalar.is_list)
                    .contains(&operator),
            },
            FieldKind::Relationship(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub name: String,
    pub labels: Vec<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl NodeDescriptor {
    /// A node stored under a single label equal to its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        NodeDescriptor {
            labels: vec![name.clone()],
            name,
            fields: Vec::new(),
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relationship_field(&self, name: &str) -> Option<&RelationshipField> {
        self.field(name).and_then(FieldDescriptor::as_relationship)
    }
}

/// Anything a where input can filter: a node, or the property fields stored
/// on a relationship.
pub trait GraphElement {
    fn element_name(&self) -> &str;
    fn find_field(&self, name: &str) -> Option<&FieldDescriptor>;
}

impl GraphElement for NodeDescriptor {
    fn element_name(&self) -> &str {
        &self.name
    }

    fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field(name)
    }
}

impl GraphElement for RelationshipField {
    fn element_name(&self) -> &str {
        &self.rel_type
    }

    fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.property(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_defaults_include_string_operators() {
        let title = FieldDescriptor::scalar("title", ScalarType::String);
        assert!(title.allows(FilterOperator::StartsWith));
        assert!(title.allows(FilterOperator::NotIn));
        assert!(!title.allows(FilterOperator::Includes));
    }

    #[test]
    fn test_numeric_defaults_exclude_string_operators() {
        let year = FieldDescriptor::scalar("year", ScalarType::Int);
        assert!(year.allows(FilterOperator::Gte));
        assert!(!year.allows(FilterOperator::Contains));
    }

    #[test]
    fn test_boolean_only_allows_not() {
        let flag = FieldDescriptor::scalar("active", ScalarType::Boolean);
        assert!(flag.allows(FilterOperator::Not));
        assert!(!flag.allows(FilterOperator::Lt));
    }

    #[test]
    fn test_explicit_operators_override_defaults() {
        let title = FieldDescriptor::scalar("title", ScalarType::String)
            .with_operators(vec![FilterOperator::Contains]);
        assert!(title.allows(FilterOperator::Contains));
        assert!(!title.allows(FilterOperator::StartsWith));
    }

    #[test]
    fn test_suffix_round_trip_for_every_operator() {
        for op in STRING_OPERATORS.iter().chain(LIST_OPERATORS) {
            assert_eq!(FilterOperator::from_suffix(op.suffix()), Some(*op));
        }
        assert_eq!(FilterOperator::from_suffix("DISTANCE"), None);
    }

    #[test]
    fn test_property_name_prefers_db_property() {
        let field = FieldDescriptor::scalar("title", ScalarType::String).with_db_property("name");
        assert_eq!(field.property_name(), "name");
    }
}
