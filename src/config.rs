use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::utils::naming::is_plain_identifier;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid identifier for {field}: '{value}' (expected [A-Za-z_][A-Za-z0-9_]*)")]
    InvalidIdentifier { field: String, value: String },

    #[error("Prefix for {field} must not end in a digit: '{value}'")]
    TrailingDigit { field: String, value: String },
}

/// Builder configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuilderConfig {
    /// Spaces used to indent CALL and EXISTS bodies
    #[validate(range(max = 16, message = "Indent width must be at most 16"))]
    pub indent_width: usize,

    /// Base name of generated parameters (`param0`, `param1`, ...)
    #[validate(length(min = 1, message = "Parameter prefix cannot be empty"))]
    pub param_prefix: String,

    /// Base name of generated node and relationship aliases (`this0`, ...)
    #[validate(length(min = 1, message = "Variable prefix cannot be empty"))]
    pub variable_prefix: String,

    /// Base name of generated value aliases (`var0`, ...)
    #[validate(length(min = 1, message = "Value prefix cannot be empty"))]
    pub value_prefix: String,

    /// Maximum nesting of AND/OR and relationship filters in a where input
    #[validate(range(
        min = 1,
        max = 1024,
        message = "Max filter depth must be between 1 and 1024"
    ))]
    pub max_filter_depth: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            param_prefix: "param".to_string(),
            variable_prefix: "this".to_string(),
            value_prefix: "var".to_string(),
            max_filter_depth: 32,
        }
    }
}

impl BuilderConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            indent_width: parse_env_var("GRAPHQL_CYPHER_INDENT_WIDTH", "4")?,
            param_prefix: env::var("GRAPHQL_CYPHER_PARAM_PREFIX")
                .unwrap_or_else(|_| "param".to_string()),
            variable_prefix: env::var("GRAPHQL_CYPHER_VARIABLE_PREFIX")
                .unwrap_or_else(|_| "this".to_string()),
            value_prefix: env::var("GRAPHQL_CYPHER_VALUE_PREFIX")
                .unwrap_or_else(|_| "var".to_string()),
            max_filter_depth: parse_env_var("GRAPHQL_CYPHER_MAX_FILTER_DEPTH", "32")?,
        };

        config.validate_all()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate_all()?;
        Ok(config)
    }

    /// Run the derived range/length checks plus the identifier checks for the
    /// naming prefixes, which end up verbatim in the generated Cypher.
    ///
    /// A prefix ending in a digit could reproduce another prefix's numbered
    /// names (`v1` + `0` and `v` + `10`), so it is rejected.
    pub fn validate_all(&self) -> Result<(), ConfigError> {
        self.validate()?;
        for (field, value) in [
            ("param_prefix", &self.param_prefix),
            ("variable_prefix", &self.variable_prefix),
            ("value_prefix", &self.value_prefix),
        ] {
            if !is_plain_identifier(value) {
                return Err(ConfigError::InvalidIdentifier {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
            if value.ends_with(|c: char| c.is_ascii_digit()) {
                return Err(ConfigError::TrailingDigit {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
