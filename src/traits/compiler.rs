// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::Debug;
use std::sync::Arc;

use crate::engine::context::{EvaluationContext, ExpressionContext};
use crate::engine::value::Value;
use crate::errors::{CompileError, EvalError};

/// The environment a compiled program runs against.
#[derive(Debug, Clone, Copy)]
pub enum Environment<'e, 'a> {
    /// Batch-aware context: `payload`, `index`, `meta()`, `metas`, `batch[]`.
    Batch(&'e EvaluationContext<'a>),
    /// Plain key/value context used for single-message evaluation.
    Vars(&'e ExpressionContext),
}

/// Turns expression source text into a reusable program.
///
/// Compilation is deterministic and needs no environment: the same source
/// always succeeds or always fails.
pub trait ExpressionCompiler: Send + Sync {
    fn compile(&self, source: &str) -> Result<Arc<dyn CompiledProgram>, CompileError>;

    fn name(&self) -> &'static str;
}

/// An immutable compiled expression.
///
/// Programs never mutate after construction and may be executed concurrently
/// from many threads against different environments.
pub trait CompiledProgram: Send + Sync + Debug {
    fn execute(&self, env: Environment<'_, '_>) -> Result<Value, EvalError>;

    /// The source text this program was compiled from.
    fn source(&self) -> &str;
}
