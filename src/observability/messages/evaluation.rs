// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-message field resolution.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// A field failed to resolve for one message.
///
/// # Log Level
/// `warn!` - Only the one message is affected
///
/// # Example
/// ```
/// use dagwood_interp::observability::messages::evaluation::FieldResolutionFailed;
/// use dagwood_interp::errors::EvalError;
///
/// let error = EvalError::EmptyBatch;
/// let msg = FieldResolutionFailed {
///     field: "topic",
///     index: 0,
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct FieldResolutionFailed<'a> {
    pub field: &'a str,
    pub index: i64,
    pub error: &'a dyn std::error::Error,
}

impl Display for FieldResolutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Field '{}' failed for message {}: {}",
            self.field, self.index, self.error
        )
    }
}

impl StructuredLog for FieldResolutionFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            field = self.field,
            index = self.index,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "evaluation",
            span_name = name,
            field = self.field,
            index = self.index,
        )
    }
}

/// Every message of a batch has been resolved.
///
/// # Log Level
/// `debug!` - Per-batch detail
pub struct BatchResolved {
    pub batch_size: usize,
    pub failed: usize,
    pub duration: std::time::Duration,
}

impl Display for BatchResolved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved batch of {} message(s), {} failed, in {:?}",
            self.batch_size, self.failed, self.duration
        )
    }
}

impl StructuredLog for BatchResolved {
    fn log(&self) {
        tracing::debug!(
            batch_size = self.batch_size,
            failed = self.failed,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "evaluation",
            span_name = name,
            batch_size = self.batch_size,
        )
    }
}
