// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for template construction events.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// Template parsed and all expressions compiled.
///
/// # Log Level
/// `debug!` - Setup detail, once per template
///
/// # Example
/// ```
/// use dagwood_interp::observability::messages::template::TemplateCompiled;
///
/// let msg = TemplateCompiled {
///     template: "Batch size: ${!len(batch)}",
///     compiler: "cel",
///     expression_count: 1,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct TemplateCompiled<'a> {
    pub template: &'a str,
    pub compiler: &'a str,
    pub expression_count: usize,
}

impl Display for TemplateCompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Template '{}' compiled with {} backend: {} expression(s)",
            self.template, self.compiler, self.expression_count
        )
    }
}

impl StructuredLog for TemplateCompiled<'_> {
    fn log(&self) {
        tracing::debug!(
            template = self.template,
            compiler = self.compiler,
            expression_count = self.expression_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "template",
            span_name = name,
            template = self.template,
            compiler = self.compiler,
            expression_count = self.expression_count,
        )
    }
}

/// Template rejected at construction.
///
/// # Log Level
/// `error!` - The owning component cannot start
///
/// # Example
/// ```
/// use dagwood_interp::observability::messages::template::TemplateRejected;
/// use dagwood_interp::errors::ParseError;
///
/// let error = ParseError::UnclosedExpression { position: 0 };
/// let msg = TemplateRejected {
///     field: "topic",
///     template: "${!meta('source')",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct TemplateRejected<'a> {
    pub field: &'a str,
    pub template: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for TemplateRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Field '{}' rejected template '{}': {}",
            self.field, self.template, self.error
        )
    }
}

impl StructuredLog for TemplateRejected<'_> {
    fn log(&self) {
        tracing::error!(
            field = self.field,
            template = self.template,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "template",
            span_name = name,
            field = self.field,
            template = self.template,
        )
    }
}
