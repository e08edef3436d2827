// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Messages are organized by subsystem:
//!
//! * `template` - template construction (compile / reject)
//! * `evaluation` - per-message field resolution
//! * `config` - configuration loading and validation

use tracing::Span;

pub mod config;
pub mod evaluation;
pub mod template;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Create a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
