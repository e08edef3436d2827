// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::engine::value::Value;
use crate::errors::{CompileError, EvalError};
use crate::traits::{CompiledProgram, Environment, ExpressionCompiler};

/// Source text the stub compiler always rejects.
pub const REJECTED_SOURCE: &str = "fail";

/// Source text whose program always fails at runtime.
pub const FAILING_SOURCE: &str = "boom";

/// A compiler that counts its calls, for observing when the expression
/// runtime is (or is not) touched.
///
/// Programs resolve their source as a variable name: `index` in a batch
/// environment, any bound name in a vars environment, and otherwise echo
/// the source back as a string.
#[derive(Debug, Clone, Default)]
pub struct StubCompiler {
    compiles: Arc<AtomicUsize>,
    executions: Arc<AtomicUsize>,
}

impl StubCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    pub fn execution_count(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl ExpressionCompiler for StubCompiler {
    fn compile(&self, source: &str) -> Result<Arc<dyn CompiledProgram>, CompileError> {
        self.compiles.fetch_add(1, Ordering::SeqCst);

        if source == REJECTED_SOURCE {
            return Err(CompileError::new(source, "rejected by stub"));
        }

        Ok(Arc::new(StubProgram {
            source: source.to_string(),
            executions: Arc::clone(&self.executions),
        }))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

#[derive(Debug)]
pub struct StubProgram {
    source: String,
    executions: Arc<AtomicUsize>,
}

impl CompiledProgram for StubProgram {
    fn execute(&self, env: Environment<'_, '_>) -> Result<Value, EvalError> {
        self.executions.fetch_add(1, Ordering::SeqCst);

        if self.source == FAILING_SOURCE {
            return Err(EvalError::runtime(&self.source, "simulated failure"));
        }

        let resolved = match env {
            Environment::Batch(ctx) if self.source == "index" => {
                Some(Value::Int(ctx.index() as i64))
            }
            Environment::Batch(_) => None,
            Environment::Vars(ctx) => ctx.get(&self.source).cloned(),
        };

        Ok(resolved.unwrap_or_else(|| Value::String(self.source.clone())))
    }

    fn source(&self) -> &str {
        &self.source
    }
}
