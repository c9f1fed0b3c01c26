//! Structured output for command results.
//!
//! Every command prints data, never prose, so stdout can be piped into
//! another tool. Diagnostics go to stderr through `tracing`.

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Value of the `--format` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

impl OutputFormat {
    pub fn serialize<T: Serialize>(self, data: &T) -> Result<String, SerializeError> {
        match self {
            OutputFormat::Json => to_json(data),
            OutputFormat::Yaml => to_yaml(data),
        }
    }
}

/// Serializes data to pretty JSON.
pub fn to_json<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Serializes data to a single JSON line.
pub fn to_json_line<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_json::to_string(data)?)
}

/// Serializes data to YAML.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_is_pretty() {
        let out = OutputFormat::Json.serialize(&json!({"a": 1})).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn json_line_is_compact() {
        let out = to_json_line(&json!({"a": [1, 2]})).unwrap();
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn yaml_output() {
        let out = OutputFormat::Yaml.serialize(&json!({"column": "Priority"})).unwrap();
        assert_eq!(out.trim(), "column: Priority");
    }

    #[test]
    fn null_serializes_in_both_formats() {
        assert_eq!(OutputFormat::Json.serialize(&()).unwrap(), "null");
        assert_eq!(OutputFormat::Yaml.serialize(&()).unwrap().trim(), "null");
    }
}
