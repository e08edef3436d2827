// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-call evaluation errors.
//!
//! An `EvalError` only ever fails the single evaluation that produced it. The
//! template that raised it stays valid and can be evaluated again.

use thiserror::Error;

use crate::errors::CompileError;

/// A value that cannot be represented as the requested type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert {actual} value {value} to {target}")]
pub struct ConversionError {
    /// Runtime type of the value, e.g. `string` or `float`.
    pub actual: String,
    /// Debug rendering of the value.
    pub value: String,
    /// Requested target type.
    pub target: &'static str,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("cannot evaluate expression on empty batch")]
    EmptyBatch,

    #[error("negative index {index} is not allowed")]
    NegativeIndex { index: i64 },

    #[error("index {index} is out of bounds for batch of size {size}")]
    IndexOutOfBounds { index: i64, size: usize },

    /// The expression backend failed while running a compiled program.
    #[error("failed to evaluate expression '{source_text}': {message}")]
    Runtime { source_text: String, message: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Re-parsing an evaluated string as a fresh expression failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("template '{template}' must be exactly one expression to evaluate as {target}")]
    SingleExpressionRequired {
        template: String,
        target: &'static str,
    },
}

impl EvalError {
    pub fn runtime(source_text: impl Into<String>, message: impl ToString) -> Self {
        EvalError::Runtime {
            source_text: source_text.into(),
            message: message.to_string(),
        }
    }
}
