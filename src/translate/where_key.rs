//! Parsing of where input keys.
//!
//! Keys have the shape `<field>[Aggregate|Connection][_<OPERATOR>]`, e.g.
//! `title_STARTS_WITH`, `actors_SOME`, `actorsConnection_NONE`,
//! `actorsAggregate`. Inside an aggregation filter the keys are
//! `count[_<OP>]` and `<field>_<FUNCTION>_<OP>`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::cypher_builder::predicate::ComparisonOperator;

lazy_static! {
    static ref WHERE_KEY: Regex = Regex::new(
        r"^(?P<field>[_A-Za-z][_0-9A-Za-z]*?)(?P<marker>Aggregate|Connection)?(?:_(?P<operator>NOT_IN|NOT_INCLUDES|NOT_CONTAINS|NOT_STARTS_WITH|NOT_ENDS_WITH|NOT|IN|INCLUDES|MATCHES|CONTAINS|STARTS_WITH|ENDS_WITH|LTE|LT|GTE|GT|ALL|NONE|SINGLE|SOME))?$"
    )
    .expect("where key regex is valid");
    static ref AGGREGATE_KEY: Regex = Regex::new(
        r"^(?P<field>[_A-Za-z][_0-9A-Za-z]*?)_(?P<function>AVERAGE_LENGTH|SHORTEST_LENGTH|LONGEST_LENGTH|AVERAGE|SUM|MIN|MAX|SHORTEST|LONGEST)_(?P<operator>EQUAL|GTE|GT|LTE|LT)$"
    )
    .expect("aggregate key regex is valid");
    static ref COUNT_KEY: Regex =
        Regex::new(r"^count(?:_(?P<operator>LTE|LT|GTE|GT))?$").expect("count key regex is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "AND" => Some(LogicalOperator::And),
            "OR" => Some(LogicalOperator::Or),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMarker {
    Aggregate,
    Connection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhereKey<'a> {
    pub field: &'a str,
    pub marker: Option<KeyMarker>,
    pub operator: Option<&'a str>,
}

/// All readings of `key`, most specific first.
///
/// A field whose own name ends in `Connection` or in an operator-like suffix
/// is still reachable through the less specific readings; the caller picks the
/// first one whose field exists on the element.
pub fn parse_where_key(key: &str) -> Vec<WhereKey<'_>> {
    let mut readings = Vec::with_capacity(3);
    if let Some(caps) = WHERE_KEY.captures(key) {
        let field = caps.name("field").map_or("", |m| m.as_str());
        let marker = caps.name("marker").map(|m| match m.as_str() {
            "Aggregate" => KeyMarker::Aggregate,
            _ => KeyMarker::Connection,
        });
        let operator = caps.name("operator").map(|m| m.as_str());
        readings.push(WhereKey {
            field,
            marker,
            operator,
        });
        if let Some(marker_match) = caps.name("marker") {
            readings.push(WhereKey {
                field: &key[..marker_match.end()],
                marker: None,
                operator,
            });
        }
        if operator.is_some() {
            readings.push(WhereKey {
                field: key,
                marker: None,
                operator: None,
            });
        }
    } else {
        readings.push(WhereKey {
            field: key,
            marker: None,
            operator: None,
        });
    }
    readings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Average,
    Sum,
    Min,
    Max,
    ShortestLength,
    LongestLength,
    AverageLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateKey<'a> {
    pub field: &'a str,
    pub function: AggregateFunction,
    pub operator: ComparisonOperator,
}

fn aggregate_operator(suffix: Option<&str>) -> ComparisonOperator {
    match suffix {
        Some("GT") => ComparisonOperator::Gt,
        Some("GTE") => ComparisonOperator::Gte,
        Some("LT") => ComparisonOperator::Lt,
        Some("LTE") => ComparisonOperator::Lte,
        _ => ComparisonOperator::Eq,
    }
}

/// Parse `<field>_<FUNCTION>_<OP>`; `SHORTEST`/`LONGEST` are the older
/// spellings of the `_LENGTH` functions.
pub fn parse_aggregate_key(key: &str) -> Option<AggregateKey<'_>> {
    let caps = AGGREGATE_KEY.captures(key)?;
    let function = match caps.name("function")?.as_str() {
        "AVERAGE" => AggregateFunction::Average,
        "SUM" => AggregateFunction::Sum,
        "MIN" => AggregateFunction::Min,
        "MAX" => AggregateFunction::Max,
        "SHORTEST_LENGTH" | "SHORTEST" => AggregateFunction::ShortestLength,
        "LONGEST_LENGTH" | "LONGEST" => AggregateFunction::LongestLength,
        _ => AggregateFunction::AverageLength,
    };
    Some(AggregateKey {
        field: caps.name("field")?.as_str(),
        function,
        operator: aggregate_operator(caps.name("operator").map(|m| m.as_str())),
    })
}

/// Parse `count[_<OP>]`.
pub fn parse_count_key(key: &str) -> Option<ComparisonOperator> {
    let caps = COUNT_KEY.captures(key)?;
    Some(aggregate_operator(caps.name("operator").map(|m| m.as_str())))
}
