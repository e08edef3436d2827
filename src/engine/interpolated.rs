// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-message interpolated templates.
//!
//! A lighter variant of [`Evaluator`](crate::engine::Evaluator) for call sites
//! that never need sibling messages. Expressions run against a plain
//! [`ExpressionContext`]. When a template has no dynamic parts its output is
//! rendered once at construction and every later `eval_string` returns that
//! cached text without touching the expression runtime.
//!
//! `eval_int` / `eval_bool` only accept a template made of exactly one
//! expression. The rendered string is compiled again as a fresh expression and
//! that result is converted; templates mixing literal text with expressions
//! are rejected for these two methods.

use std::sync::Arc;

use crate::backends::cel::CelCompiler;
use crate::engine::coercion;
use crate::engine::context::ExpressionContext;
use crate::engine::parser::{parse, Fragment};
use crate::engine::value::Value;
use crate::errors::{EvalError, TemplateError};
use crate::traits::{CompiledProgram, Environment, ExpressionCompiler};

#[derive(Debug, Clone)]
pub enum Resolver {
    StaticText(String),
    DynamicExpression(Arc<dyn CompiledProgram>),
}

#[derive(Clone)]
pub struct InterpolatedTemplate {
    original: String,
    resolvers: Vec<Resolver>,
    /// Pre-rendered output, present only when every resolver is static.
    rendered: Option<String>,
    compiler: Arc<dyn ExpressionCompiler>,
}

impl InterpolatedTemplate {
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        Self::with_compiler(template, Arc::new(CelCompiler::new()))
    }

    pub fn with_compiler(
        template: &str,
        compiler: Arc<dyn ExpressionCompiler>,
    ) -> Result<Self, TemplateError> {
        let resolvers = parse(template)?
            .into_iter()
            .map(|fragment| match fragment {
                Fragment::Literal(text) => Ok(Resolver::StaticText(text)),
                Fragment::Expression(source) => {
                    Ok(Resolver::DynamicExpression(compiler.compile(&source)?))
                }
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;

        let rendered = resolvers
            .iter()
            .map(|resolver| match resolver {
                Resolver::StaticText(text) => Some(text.as_str()),
                Resolver::DynamicExpression(_) => None,
            })
            .collect::<Option<String>>();

        Ok(Self {
            original: template.to_string(),
            resolvers,
            rendered,
            compiler,
        })
    }

    /// True when the output is constant for the template's lifetime.
    pub fn is_static(&self) -> bool {
        self.rendered.is_some()
    }

    pub fn eval_string(&self, ctx: &ExpressionContext) -> Result<String, EvalError> {
        if let Some(rendered) = &self.rendered {
            return Ok(rendered.clone());
        }

        let mut out = String::new();
        for resolver in &self.resolvers {
            match resolver {
                Resolver::StaticText(text) => out.push_str(text),
                Resolver::DynamicExpression(program) => {
                    out.push_str(&program.execute(Environment::Vars(ctx))?.to_string())
                }
            }
        }
        Ok(out)
    }

    pub fn eval_int(&self, ctx: &ExpressionContext) -> Result<i64, EvalError> {
        let value = self.reevaluate(ctx, "int")?;
        Ok(coercion::to_int(&value)?)
    }

    pub fn eval_bool(&self, ctx: &ExpressionContext) -> Result<bool, EvalError> {
        let value = self.reevaluate(ctx, "bool")?;
        Ok(coercion::to_bool(&value)?)
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn resolvers(&self) -> &[Resolver] {
        &self.resolvers
    }

    /// Render the single expression, then evaluate the rendered text as an
    /// expression of its own.
    fn reevaluate(
        &self,
        ctx: &ExpressionContext,
        target: &'static str,
    ) -> Result<Value, EvalError> {
        if !matches!(self.resolvers.as_slice(), [Resolver::DynamicExpression(_)]) {
            return Err(EvalError::SingleExpressionRequired {
                template: self.original.clone(),
                target,
            });
        }

        let rendered = self.eval_string(ctx)?;
        let program = self.compiler.compile(&rendered)?;
        program.execute(Environment::Vars(ctx))
    }
}

impl std::fmt::Debug for InterpolatedTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpolatedTemplate")
            .field("original", &self.original)
            .field("resolvers", &self.resolvers)
            .field("compiler", &self.compiler.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StubCompiler;

    fn stub() -> (StubCompiler, Arc<dyn ExpressionCompiler>) {
        let compiler = StubCompiler::new();
        let shared: Arc<dyn ExpressionCompiler> = Arc::new(compiler.clone());
        (compiler, shared)
    }

    #[test]
    fn test_static_template_never_touches_runtime() {
        let (compiler, shared) = stub();
        let template = InterpolatedTemplate::with_compiler("orders.${{!region}}", shared).unwrap();

        assert!(template.is_static());
        for _ in 0..5 {
            assert_eq!(
                template.eval_string(&ExpressionContext::new()).unwrap(),
                "orders.${!region}"
            );
        }
        assert_eq!(compiler.compile_count(), 0);
        assert_eq!(compiler.execution_count(), 0);
    }

    #[test]
    fn test_dynamic_template_resolves_each_call() {
        let (compiler, shared) = stub();
        let template = InterpolatedTemplate::with_compiler("q-${!tenant}", shared).unwrap();
        assert!(!template.is_static());

        let ctx = ExpressionContext::new().with_var("tenant", "acme");
        assert_eq!(template.eval_string(&ctx).unwrap(), "q-acme");

        let ctx = ExpressionContext::new().with_var("tenant", "globex");
        assert_eq!(template.eval_string(&ctx).unwrap(), "q-globex");

        assert_eq!(compiler.compile_count(), 1);
        assert_eq!(compiler.execution_count(), 2);
    }

    #[test]
    fn test_eval_int_reparses_rendered_output() {
        let (compiler, shared) = stub();
        let template = InterpolatedTemplate::with_compiler("${!partition}", shared).unwrap();
        let ctx = ExpressionContext::new().with_var("partition", Value::Int(7));

        assert_eq!(template.eval_int(&ctx).unwrap(), 7);
        // once at construction, once for the rendered "7"
        assert_eq!(compiler.compile_count(), 2);
    }

    #[test]
    fn test_eval_bool_single_expression() {
        let (_, shared) = stub();
        let template = InterpolatedTemplate::with_compiler("${!enabled}", shared).unwrap();
        let ctx = ExpressionContext::new().with_var("enabled", true);

        assert!(template.eval_bool(&ctx).unwrap());
    }

    #[test]
    fn test_typed_eval_rejects_mixed_templates() {
        let (_, shared) = stub();
        let ctx = ExpressionContext::new().with_var("n", Value::Int(1));

        let mixed = InterpolatedTemplate::with_compiler("n=${!n}", shared.clone()).unwrap();
        let err = mixed.eval_int(&ctx).unwrap_err();
        assert!(matches!(err, EvalError::SingleExpressionRequired { target: "int", .. }));

        let fixed = InterpolatedTemplate::with_compiler("true", shared).unwrap();
        let err = fixed.eval_bool(&ctx).unwrap_err();
        assert!(matches!(err, EvalError::SingleExpressionRequired { target: "bool", .. }));
    }

    #[test]
    fn test_construction_errors() {
        let (_, shared) = stub();

        let err = InterpolatedTemplate::with_compiler("${!fail}", shared.clone()).unwrap_err();
        assert!(matches!(err, TemplateError::Compile(_)));

        let err = InterpolatedTemplate::with_compiler("x ${{!y}", shared).unwrap_err();
        assert!(matches!(err, TemplateError::Parse(_)));
    }

    #[test]
    fn test_with_cel_backend() {
        let template = InterpolatedTemplate::new("${!index + 1}").unwrap();
        let ctx = ExpressionContext::new().with_var("index", Value::Int(2));

        assert_eq!(template.eval_string(&ctx).unwrap(), "3");
        assert_eq!(template.eval_int(&ctx).unwrap(), 3);

        let flag = InterpolatedTemplate::new("${!meta('enabled') == 'yes'}").unwrap();
        let ctx = ExpressionContext::new()
            .with_metadata([("enabled".to_string(), "yes".to_string())].into());
        assert!(flag.eval_bool(&ctx).unwrap());
    }

    #[test]
    fn test_escaped_example_is_static() {
        let template = InterpolatedTemplate::new("Template: ${{!example}}").unwrap();

        assert!(template.is_static());
        assert_eq!(
            template.eval_string(&ExpressionContext::new()).unwrap(),
            "Template: ${!example}"
        );
    }
}
