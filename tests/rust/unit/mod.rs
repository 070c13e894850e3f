//! Unit tests - statement tree and descriptor loading through the public API
//!
//! These tests need no schema beyond what they build inline.

mod schema_loading_tests;
mod statement_tree_tests;
