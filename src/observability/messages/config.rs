// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading and validation.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// Configuration loaded from disk.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use dagwood_interp::observability::messages::config::ConfigLoaded;
///
/// let msg = ConfigLoaded {
///     path: "fields.yaml",
///     field_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub field_count: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded configuration '{}': {} field(s)",
            self.path, self.field_count
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            field_count = self.field_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config",
            span_name = name,
            path = self.path,
            field_count = self.field_count,
        )
    }
}

/// Configuration failed validation.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ConfigValidationFailed {
    pub error_count: usize,
}

impl Display for ConfigValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration validation failed with {} error(s)",
            self.error_count
        )
    }
}

impl StructuredLog for ConfigValidationFailed {
    fn log(&self) {
        tracing::error!(error_count = self.error_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("config", span_name = name, error_count = self.error_count)
    }
}
