// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use thiserror::Error;

use crate::errors::{EvalError, TemplateError};

/// Errors that can occur while validating a dynamic field configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two fields share the same name
    DuplicateFieldName {
        /// The repeated name
        name: String,
    },
    /// A field was declared with an empty (or all-whitespace) name
    EmptyFieldName {
        /// Position of the field in the `fields` list
        position: usize,
    },
    /// The field's scope has no evaluation path for its kind
    UnsupportedKind {
        /// The offending field
        name: String,
        /// Requested kind, e.g. `float`
        kind: String,
        /// Scope the field was declared with
        scope: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateFieldName { name } => {
                write!(f, "Duplicate field name: '{}'", name)
            }
            ValidationError::EmptyFieldName { position } => {
                write!(f, "Field at position {} has an empty name", position)
            }
            ValidationError::UnsupportedKind { name, kind, scope } => {
                write!(
                    f,
                    "Field '{}' cannot be resolved as {} with {} scope",
                    name, kind, scope
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a configuration and building its field registry.
///
/// All of these are fatal to the owning component: it should refuse to start.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config format '{0}', expected .yaml, .yml or .toml")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Validation(Vec<ValidationError>),

    #[error("Field '{field}' has an invalid template: {source}")]
    Template {
        field: String,
        #[source]
        source: TemplateError,
    },
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single field failing to resolve for one message.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Field '{field}' failed to resolve: {source}")]
pub struct FieldError {
    pub field: String,
    #[source]
    pub source: EvalError,
}
