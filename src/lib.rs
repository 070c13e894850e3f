//! graphql-cypher - Cypher query building for GraphQL-style read requests
//!
//! This crate turns declarative graph reads into parameterized Cypher through:
//! - Element descriptors for nodes, fields and relationships
//! - A where-input compiler (boolean operators, scalar comparisons,
//!   relationship quantifiers, connection and aggregation filters)
//! - A composable statement tree rendered with collision-free aliases and a
//!   separate parameter table

pub mod utils;

pub mod config;
pub mod cypher_builder;
pub mod graph_catalog;
pub mod translate;
