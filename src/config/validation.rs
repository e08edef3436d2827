// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for dynamic field definitions.
//!
//! Checks run over every field and all problems are returned together, so a
//! broken config can be fixed in one pass:
//!
//! 1. **Names**: non-empty and unique
//! 2. **Kind / scope**: the chosen scope can produce the chosen kind
//!    (message-scoped fields have no float evaluation)
//!
//! Template syntax is not checked here; it is checked when the
//! [`FieldMap`](crate::config::FieldMap) compiles each template.

use std::collections::HashSet;

use crate::config::{Config, FieldKind, FieldScope};
use crate::errors::ValidationError;

pub fn validate_fields(cfg: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (position, field) in cfg.fields.iter().enumerate() {
        if field.name.trim().is_empty() {
            errors.push(ValidationError::EmptyFieldName { position });
        } else if !seen.insert(field.name.as_str()) {
            errors.push(ValidationError::DuplicateFieldName {
                name: field.name.clone(),
            });
        }

        if field.scope == FieldScope::Message && field.kind == FieldKind::Float {
            errors.push(ValidationError::UnsupportedKind {
                name: field.name.clone(),
                kind: field.kind.as_str().to_string(),
                scope: field.scope.as_str().to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompilerType, FailureStrategy, FieldConfig};

    fn field(name: &str, kind: FieldKind, scope: FieldScope) -> FieldConfig {
        FieldConfig {
            name: name.to_string(),
            template: "${!index}".to_string(),
            kind,
            scope,
        }
    }

    fn config(fields: Vec<FieldConfig>) -> Config {
        Config {
            compiler: CompilerType::Cel,
            failure_strategy: FailureStrategy::FailMessage,
            fields,
        }
    }

    #[test]
    fn test_valid_config() {
        let cfg = config(vec![
            field("topic", FieldKind::String, FieldScope::Batch),
            field("ratio", FieldKind::Float, FieldScope::Batch),
            field("retain", FieldKind::Bool, FieldScope::Message),
        ]);

        assert!(validate_fields(&cfg).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let cfg = config(vec![
            field("topic", FieldKind::String, FieldScope::Batch),
            field("topic", FieldKind::String, FieldScope::Batch),
            field("  ", FieldKind::Int, FieldScope::Batch),
            field("ratio", FieldKind::Float, FieldScope::Message),
        ]);

        let errors = validate_fields(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateFieldName {
                    name: "topic".to_string()
                },
                ValidationError::EmptyFieldName { position: 2 },
                ValidationError::UnsupportedKind {
                    name: "ratio".to_string(),
                    kind: "float".to_string(),
                    scope: "message".to_string(),
                },
            ]
        );
    }
}
