// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Construction-time errors for templates.
//!
//! Both kinds are raised only while a template is being built. A template that
//! fails either step is rejected as a whole; there is no partially valid template.

use thiserror::Error;

/// Malformed template syntax.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `${!` marker whose braces never balance back to zero.
    #[error("unclosed expression starting at position {position}")]
    UnclosedExpression { position: usize },

    /// A `${{!` marker with no `}}` anywhere after it.
    #[error("unclosed escaped expression starting at position {position}")]
    UnclosedEscape { position: usize },
}

impl ParseError {
    /// Byte offset of the start marker that was never closed.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnclosedExpression { position }
            | ParseError::UnclosedEscape { position } => *position,
        }
    }
}

/// Expression source rejected by the expression backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to compile expression '{source_text}': {message}")]
pub struct CompileError {
    pub source_text: String,
    pub message: String,
}

impl CompileError {
    pub fn new(source_text: impl Into<String>, message: impl ToString) -> Self {
        Self {
            source_text: source_text.into(),
            message: message.to_string(),
        }
    }
}

/// Either construction step failing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
