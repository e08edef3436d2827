// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Batch-aware template evaluator.
//!
//! A template is parsed and every expression compiled once, when the owning
//! component sets up its dynamic field. After that the evaluator is immutable
//! and is evaluated once per outgoing message against a fresh
//! [`EvaluationContext`]; it is safe to share across threads.
//!
//! # Result shape
//! * exactly one expression segment: the program's native result, unconverted
//! * anything else: every segment rendered and concatenated into a string
//!
//! # Example
//! ```
//! use dagwood_interp::engine::{Evaluator, Value};
//! use dagwood_interp::message::Message;
//!
//! let batch = vec![Message::new("a"), Message::new("b"), Message::new("c")];
//!
//! let size = Evaluator::new("${!len(batch)}").unwrap();
//! assert_eq!(size.eval(&batch, 0).unwrap(), Value::Int(3));
//!
//! let label = Evaluator::new("Batch size: ${!len(batch)}").unwrap();
//! assert_eq!(label.eval_string(&batch, 0).unwrap(), "Batch size: 3");
//! ```

use std::sync::Arc;

use crate::backends::cel::CelCompiler;
use crate::engine::coercion;
use crate::engine::context::EvaluationContext;
use crate::engine::parser::{parse, Fragment};
use crate::engine::value::Value;
use crate::errors::{EvalError, TemplateError};
use crate::message::Message;
use crate::observability::messages::{template::TemplateCompiled, StructuredLog};
use crate::traits::{CompiledProgram, Environment, ExpressionCompiler};

/// One parsed and compiled piece of a template.
#[derive(Debug, Clone)]
pub enum Segment {
    Literal {
        text: String,
    },
    Expression {
        source: String,
        program: Arc<dyn CompiledProgram>,
    },
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    original: String,
    segments: Vec<Segment>,
}

impl Evaluator {
    /// Parse `template` and compile its expressions with the default CEL backend.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        Self::with_compiler(template, &CelCompiler::new())
    }

    /// Parse `template` and compile its expressions with `compiler`.
    ///
    /// Fails on the first parse or compile error; no partially valid
    /// evaluator is ever returned.
    pub fn with_compiler(
        template: &str,
        compiler: &dyn ExpressionCompiler,
    ) -> Result<Self, TemplateError> {
        let segments = parse(template)?
            .into_iter()
            .map(|fragment| match fragment {
                Fragment::Literal(text) => Ok(Segment::Literal { text }),
                Fragment::Expression(source) => {
                    let program = compiler.compile(&source)?;
                    Ok(Segment::Expression { source, program })
                }
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;

        let evaluator = Self {
            original: template.to_string(),
            segments,
        };

        TemplateCompiled {
            template,
            compiler: compiler.name(),
            expression_count: evaluator.expression_count(),
        }
        .log();

        Ok(evaluator)
    }

    /// Evaluate against `batch[index]`.
    pub fn eval(&self, batch: &[Message], index: i64) -> Result<Value, EvalError> {
        let ctx = EvaluationContext::build(batch, index)?;
        let env = Environment::Batch(&ctx);

        if let [Segment::Expression { program, .. }] = self.segments.as_slice() {
            return program.execute(env);
        }

        let mut rendered = String::with_capacity(self.original.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal { text } => rendered.push_str(text),
                Segment::Expression { program, .. } => {
                    rendered.push_str(&program.execute(env)?.to_string())
                }
            }
        }

        Ok(Value::String(rendered))
    }

    pub fn eval_string(&self, batch: &[Message], index: i64) -> Result<String, EvalError> {
        Ok(coercion::to_string(&self.eval(batch, index)?)?)
    }

    pub fn eval_int(&self, batch: &[Message], index: i64) -> Result<i64, EvalError> {
        Ok(coercion::to_int(&self.eval(batch, index)?)?)
    }

    pub fn eval_bool(&self, batch: &[Message], index: i64) -> Result<bool, EvalError> {
        Ok(coercion::to_bool(&self.eval(batch, index)?)?)
    }

    pub fn eval_f64(&self, batch: &[Message], index: i64) -> Result<f64, EvalError> {
        Ok(coercion::to_f64(&self.eval(batch, index)?)?)
    }

    pub fn has_expressions(&self) -> bool {
        self.expression_count() > 0
    }

    pub fn expression_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Expression { .. }))
            .count()
    }

    /// The template source exactly as it was given.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
