//! Centralized naming utilities for generated Cypher identifiers.
//!
//! All generated aliases and parameter names go through these functions so the
//! allocator, the pattern renderer and the config validation agree on one format.
//!
//! ## Naming Convention
//! Format: `{scope_prefix}{base}{counter}`
//! - `scope_prefix` is empty at the top level and `{allocated_name}_` inside a
//!   CALL body, so nested scopes look like `this0_this1_param0`
//! - `base` is one of the configured prefixes (`this`, `var`, `param`)
//! - `counter` increments per `(scope_prefix, base)` pair
//!
//! Examples:
//! - `("", "param", 0)` → `"param0"`
//! - `("this0_", "this", 2)` → `"this0_this2"`

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PLAIN_IDENTIFIER: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid");
}

/// Generate a scoped name with a sequence counter.
///
/// # Examples
/// ```
/// use graphql_cypher::utils::naming::scoped_name;
///
/// assert_eq!(scoped_name("", "param", 0), "param0");
/// assert_eq!(scoped_name("this0_", "var", 3), "this0_var3");
/// ```
pub fn scoped_name(scope_prefix: &str, base: &str, counter: usize) -> String {
    format!("{}{}{}", scope_prefix, base, counter)
}

/// Turn an allocated name into the prefix for a child scope.
///
/// # Examples
/// ```
/// use graphql_cypher::utils::naming::child_scope_prefix;
///
/// assert_eq!(child_scope_prefix("this0"), "this0_");
/// ```
pub fn child_scope_prefix(allocated: &str) -> String {
    format!("{}_", allocated)
}

/// Whether `name` can appear in Cypher without backtick quoting.
pub fn is_plain_identifier(name: &str) -> bool {
    PLAIN_IDENTIFIER.is_match(name)
}

/// Quote a label, relationship type or property key when needed.
///
/// # Examples
/// ```
/// use graphql_cypher::utils::naming::escape_identifier;
///
/// assert_eq!(escape_identifier("Movie"), "Movie");
/// assert_eq!(escape_identifier("My Label"), "`My Label`");
/// assert_eq!(escape_identifier("we`ird"), "`we``ird`");
/// ```
pub fn escape_identifier(name: &str) -> String {
    if is_plain_identifier(name) {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

/// Indent every non-empty line of `text` by `width` spaces.
pub fn indent_block(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers() {
        assert!(is_plain_identifier("this"));
        assert!(is_plain_identifier("_private1"));
        assert!(!is_plain_identifier("1abc"));
        assert!(!is_plain_identifier(""));
        assert!(!is_plain_identifier("has-dash"));
    }

    #[test]
    fn test_escape_identifier_multiple_backticks() {
        assert_eq!(escape_identifier("a`b`c"), "`a``b``c`");
    }

    #[test]
    fn test_indent_block_keeps_blank_lines_empty() {
        assert_eq!(indent_block("a\n\nb", 2), "  a\n\n  b");
    }

    #[test]
    fn test_nested_scope_names() {
        let outer = scoped_name("", "this", 0);
        let inner_prefix = child_scope_prefix(&outer);
        assert_eq!(scoped_name(&inner_prefix, "param", 1), "this0_param1");
    }
}
