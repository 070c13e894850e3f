//! Integration tests - where compilation and read translation end to end
//!
//! These tests load descriptors from YAML and check the full Cypher text and
//! parameter table produced through the public API.

mod fixtures;
mod read_translation_tests;
mod where_predicate_tests;
