// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use cel_interpreter::{Context, Program};

use super::bindings;
use super::convert::from_cel;
use crate::engine::value::Value;
use crate::errors::{CompileError, EvalError};
use crate::traits::{CompiledProgram, Environment, ExpressionCompiler};

/// Compiles expression source into CEL programs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CelCompiler;

impl CelCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionCompiler for CelCompiler {
    fn compile(&self, source: &str) -> Result<Arc<dyn CompiledProgram>, CompileError> {
        let program = Program::compile(source).map_err(|e| CompileError::new(source, e))?;

        Ok(Arc::new(CelProgram {
            source: source.to_string(),
            program,
        }))
    }

    fn name(&self) -> &'static str {
        "cel"
    }
}

pub struct CelProgram {
    source: String,
    program: Program,
}

impl CelProgram {
    /// Runs the program, turning a panic inside the interpreter (integer
    /// overflow, division by zero) into a runtime error.
    fn run(&self, context: &Context) -> Result<Value, EvalError> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.program.execute(context))) {
            Ok(result) => result
                .map(from_cel)
                .map_err(|e| EvalError::runtime(&self.source, e)),
            Err(payload) => Err(EvalError::runtime(&self.source, panic_message(&*payload))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "expression runtime panicked".to_string()
    }
}

impl CompiledProgram for CelProgram {
    fn execute(&self, env: Environment<'_, '_>) -> Result<Value, EvalError> {
        match env {
            Environment::Batch(ctx) => {
                let build = || {
                    let mut context = Context::default();
                    bindings::bind_batch(&mut context, ctx);
                    context
                };

                // Every expression of one evaluation shares the bound batch.
                match ctx.bindings().get_or_init(build) {
                    Some(context) => self.run(context),
                    None => self.run(&build()),
                }
            }
            Environment::Vars(ctx) => {
                let mut context = Context::default();
                bindings::bind_vars(&mut context, ctx);
                self.run(&context)
            }
        }
    }

    fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for CelProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CelProgram")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::{EvaluationContext, ExpressionContext};
    use crate::message::Message;

    fn batch() -> Vec<Message> {
        vec![
            Message::new("alpha").with_metadata("source", "api"),
            Message::new("beta").with_metadata("source", "webhook"),
            Message::new("gamma").with_metadata("source", "api"),
        ]
    }

    fn run(source: &str, index: i64) -> Result<Value, EvalError> {
        let batch = batch();
        let ctx = EvaluationContext::build(&batch, index)?;
        let program = CelCompiler::new().compile(source).expect("compiles");
        program.execute(Environment::Batch(&ctx))
    }

    #[test]
    fn test_compile_rejects_invalid_source() {
        let err = CelCompiler::new().compile("1 +").unwrap_err();
        assert_eq!(err.source_text, "1 +");
        assert!(err.to_string().starts_with("failed to compile expression '1 +'"));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let compiler = CelCompiler::new();
        for _ in 0..3 {
            assert!(compiler.compile("index + 1").is_ok());
            assert!(compiler.compile("(index").is_err());
        }
    }

    #[test]
    fn test_batch_bindings() {
        assert_eq!(run("payload", 1).unwrap(), Value::from("beta"));
        assert_eq!(run("index", 2).unwrap(), Value::Int(2));
        assert_eq!(run("len(batch)", 0).unwrap(), Value::Int(3));
        assert_eq!(run("len(payload)", 0).unwrap(), Value::Int(5));
        assert_eq!(run("len(payloadBytes)", 2).unwrap(), Value::Int(5));
        assert_eq!(run("meta('source')", 1).unwrap(), Value::from("webhook"));
        assert_eq!(run("meta('nonexistent')", 1).unwrap(), Value::from(""));
        assert_eq!(run("metas['source']", 2).unwrap(), Value::from("api"));
    }

    #[test]
    fn test_sibling_access() {
        assert_eq!(
            run("batch[0].GetHeader('source')", 1).unwrap(),
            Value::from("api")
        );
        assert_eq!(
            run("batch[1].GetHeader('missing')", 0).unwrap(),
            Value::from("")
        );
        assert_eq!(run("batch[2].payload", 0).unwrap(), Value::from("gamma"));
        assert_eq!(
            run("batch[1].metadata['source']", 0).unwrap(),
            Value::from("webhook")
        );
    }

    #[test]
    fn test_native_result_types() {
        assert_eq!(run("index == 1 ? 1.5 : 0.0", 1).unwrap(), Value::Float(1.5));
        assert_eq!(run("len(batch) - 3", 0).unwrap(), Value::Int(0));
        assert_eq!(run("index == 1", 1).unwrap(), Value::Bool(true));
        assert_eq!(run("[1, 2]", 0).unwrap().type_name(), "list");
    }

    #[test]
    fn test_runtime_error_names_source() {
        let err = run("undefined_name + 1", 0).unwrap_err();
        match err {
            EvalError::Runtime { source_text, .. } => assert_eq!(source_text, "undefined_name + 1"),
            other => panic!("expected runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_interpreter_panic_is_runtime_error() {
        let program = CelCompiler::new()
            .compile("index / (len(batch) - 3)")
            .unwrap();
        let batch = batch();

        for _ in 0..2 {
            let ctx = EvaluationContext::build(&batch, 1).unwrap();
            let err = program.execute(Environment::Batch(&ctx)).unwrap_err();
            match err {
                EvalError::Runtime { source_text, .. } => {
                    assert_eq!(source_text, "index / (len(batch) - 3)")
                }
                other => panic!("expected runtime error, got {:?}", other),
            }
        }

        assert_eq!(run("index / (len(batch) - 1)", 2).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_segments_share_one_bound_context() {
        let batch = batch();
        let ctx = EvaluationContext::build(&batch, 0).unwrap();
        let compiler = CelCompiler::new();

        let first = compiler.compile("payload").unwrap();
        let second = compiler.compile("batch[2].payload").unwrap();

        assert!(!ctx.bindings().is_filled());
        assert_eq!(first.execute(Environment::Batch(&ctx)).unwrap(), Value::from("alpha"));
        assert!(ctx.bindings().is_filled());
        assert_eq!(second.execute(Environment::Batch(&ctx)).unwrap(), Value::from("gamma"));
    }

    #[test]
    fn test_vars_environment() {
        let ctx = ExpressionContext::new()
            .with_var("count", 4i64)
            .with_var("name", "orders")
            .with_metadata([("tenant".to_string(), "acme".to_string())].into());

        let compiler = CelCompiler::new();
        let eval = |source: &str| {
            compiler
                .compile(source)
                .unwrap()
                .execute(Environment::Vars(&ctx))
                .unwrap()
        };

        assert_eq!(eval("count * 2"), Value::Int(8));
        assert_eq!(eval("name + '-' + meta('tenant')"), Value::from("orders-acme"));
        assert_eq!(eval("meta('missing')"), Value::from(""));
    }
}
