// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::observability::messages::config::{ConfigLoaded, ConfigValidationFailed};
use crate::observability::messages::StructuredLog;

/// Dynamic field configuration for one connector component.
///
/// Each field is a template evaluated per outgoing message. Templates are
/// compiled once when the component starts; a bad template stops the
/// component from starting.
///
/// # Fields
/// * `compiler` - Expression backend (optional, defaults to `cel`)
/// * `failure_strategy` - What a failing field does to its message
///   (optional, defaults to `fail_message`)
/// * `fields` - The dynamic fields themselves
///
/// # Example
/// ```yaml
/// compiler: cel
/// failure_strategy: fail_message
/// fields:
///   - name: topic
///     template: "events.${!meta('source')}"
///   - name: partition
///     template: "${!index % 4}"
///     kind: int
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compiler: CompilerType,
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    pub fields: Vec<FieldConfig>,
}

/// Expression backend used to compile every template in a config.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompilerType {
    #[default]
    Cel,
}

/// How a field that fails to resolve affects its message.
///
/// # Variants
/// * `FailMessage` - The message fails with the first field error
/// * `ContinueOnError` - The failing field is logged and left out; the rest still resolve
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    #[default]
    FailMessage,
    ContinueOnError,
}

/// Configuration for a single dynamic field.
///
/// # Example
/// ```yaml
/// name: retain
/// template: "${!meta('retain') == 'yes'}"
/// kind: bool
/// scope: message
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct FieldConfig {
    pub name: String,
    pub template: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub scope: FieldScope,
}

/// Static type a field resolves to.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    String,
    Int,
    Bool,
    Float,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int => "int",
            FieldKind::Bool => "bool",
            FieldKind::Float => "float",
        }
    }
}

/// Which evaluator backs a field.
///
/// * `Batch` - full batch context, sibling messages reachable through `batch[i]`
/// * `Message` - single-message interpolation; static templates are pre-rendered
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldScope {
    #[default]
    Batch,
    Message,
}

impl FieldScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldScope::Batch => "batch",
            FieldScope::Message => "message",
        }
    }
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let cfg: Config = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };

    ConfigLoaded {
        path: &path.display().to_string(),
        field_count: cfg.fields.len(),
    }
    .log();

    Ok(cfg)
}

/// Load and validate a config file
///
/// Every validation problem is collected and reported together.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;

    if let Err(errors) = crate::config::validate_fields(&cfg) {
        ConfigValidationFailed {
            error_count: errors.len(),
        }
        .log();
        return Err(ConfigError::Validation(errors));
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
fields:
  - name: topic
    template: "events.${!meta('source')}"
  - name: partition
    template: "${!index % 4}"
    kind: int
    scope: message
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.compiler, CompilerType::Cel);
        assert_eq!(cfg.failure_strategy, FailureStrategy::FailMessage);
        assert_eq!(cfg.fields.len(), 2);
        assert_eq!(cfg.fields[0].kind, FieldKind::String);
        assert_eq!(cfg.fields[0].scope, FieldScope::Batch);
        assert_eq!(cfg.fields[1].kind, FieldKind::Int);
        assert_eq!(cfg.fields[1].scope, FieldScope::Message);
    }

    #[test]
    fn parse_failure_strategy() {
        let yaml = r#"
failure_strategy: continue_on_error
fields: []
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.failure_strategy, FailureStrategy::ContinueOnError);
        assert!(cfg.fields.is_empty());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let yaml = r#"
fields:
  - name: topic
    template: "x"
    kind: decimal
"#;

        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.yaml");
        std::fs::write(
            &path,
            "fields:\n  - name: queue\n    template: \"q-${!index}\"\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.fields[0].name, "queue");
        assert_eq!(cfg.fields[0].template, "q-${!index}");
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.toml");
        std::fs::write(
            &path,
            r#"
failure_strategy = "continue_on_error"

[[fields]]
name = "subject"
template = "orders.${!meta('region')}"

[[fields]]
name = "urgent"
template = "${!meta('priority') == 'high'}"
kind = "bool"
"#,
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.failure_strategy, FailureStrategy::ContinueOnError);
        assert_eq!(cfg.fields.len(), 2);
        assert_eq!(cfg.fields[1].kind, FieldKind::Bool);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.json");
        std::fs::write(&path, "{}").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_and_validate_duplicate_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dupes.yml");
        std::fs::write(
            &path,
            r#"
fields:
  - name: topic
    template: "a"
  - name: topic
    template: "b"
"#,
        )
        .unwrap();

        let err = load_and_validate_config(&path).unwrap_err();
        assert!(err.to_string().contains("Duplicate field name: 'topic'"));
    }
}
