// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::backends::cel::CelCompiler;
use crate::config::{CompilerType, Config, FailureStrategy, FieldConfig, FieldKind, FieldScope};
use crate::engine::{coercion, Evaluator, ExpressionContext, InterpolatedTemplate, Value};
use crate::errors::{ConfigError, EvalError, FieldError};
use crate::message::Message;
use crate::observability::messages::evaluation::{BatchResolved, FieldResolutionFailed};
use crate::observability::messages::template::TemplateRejected;
use crate::observability::messages::StructuredLog;
use crate::traits::ExpressionCompiler;

/// Field name to resolved value, ordered by name.
pub type ResolvedFields = BTreeMap<String, Value>;

/// The compiled evaluator behind one field.
#[derive(Debug, Clone)]
pub enum FieldEvaluator {
    Batch(Evaluator),
    Message(InterpolatedTemplate),
}

/// A compiled dynamic field.
#[derive(Debug, Clone)]
pub struct DynamicField {
    pub name: String,
    pub kind: FieldKind,
    pub evaluator: FieldEvaluator,
}

impl DynamicField {
    fn compile(
        field: &FieldConfig,
        compiler: &Arc<dyn ExpressionCompiler>,
    ) -> Result<Self, ConfigError> {
        let evaluator = match field.scope {
            FieldScope::Batch => Evaluator::with_compiler(&field.template, compiler.as_ref())
                .map(FieldEvaluator::Batch),
            FieldScope::Message => {
                InterpolatedTemplate::with_compiler(&field.template, Arc::clone(compiler))
                    .map(FieldEvaluator::Message)
            }
        };

        let evaluator = evaluator.map_err(|source| {
            TemplateRejected {
                field: &field.name,
                template: &field.template,
                error: &source,
            }
            .log();
            ConfigError::Template {
                field: field.name.clone(),
                source,
            }
        })?;

        Ok(Self {
            name: field.name.clone(),
            kind: field.kind,
            evaluator,
        })
    }

    /// Resolve this field for `batch[index]` as its configured kind.
    pub fn resolve(&self, batch: &[Message], index: i64) -> Result<Value, EvalError> {
        match &self.evaluator {
            FieldEvaluator::Batch(evaluator) => match self.kind {
                FieldKind::String => evaluator.eval_string(batch, index).map(Value::String),
                FieldKind::Int => evaluator.eval_int(batch, index).map(Value::Int),
                FieldKind::Bool => evaluator.eval_bool(batch, index).map(Value::Bool),
                FieldKind::Float => evaluator.eval_f64(batch, index).map(Value::Float),
            },
            FieldEvaluator::Message(template) => {
                let position = crate::engine::context::check_index(batch.len(), index)?;
                let ctx = ExpressionContext::for_message(&batch[position], position);

                match self.kind {
                    FieldKind::String => template.eval_string(&ctx).map(Value::String),
                    FieldKind::Int => template.eval_int(&ctx).map(Value::Int),
                    FieldKind::Bool => template.eval_bool(&ctx).map(Value::Bool),
                    FieldKind::Float => {
                        let rendered = Value::String(template.eval_string(&ctx)?);
                        Ok(Value::Float(coercion::to_f64(&rendered)?))
                    }
                }
            }
        }
    }
}

/// Registry of every dynamic field a component declares.
///
/// Built once from a [`Config`]: every template is parsed and compiled up
/// front, so a bad template stops the component before any message is seen.
/// After construction the map is immutable and can be shared across threads
/// behind an `Arc`.
///
/// # Example
/// ```
/// use dagwood_interp::config::{Config, FieldMap};
/// use dagwood_interp::engine::Value;
/// use dagwood_interp::message::Message;
///
/// let cfg: Config = serde_yaml::from_str(r#"
/// fields:
///   - name: topic
///     template: "events.${!meta('source')}"
///   - name: partition
///     template: "${!index % 2}"
///     kind: int
/// "#).unwrap();
///
/// let fields = FieldMap::from_config(&cfg).unwrap();
/// let batch = vec![
///     Message::new("a").with_metadata("source", "api"),
///     Message::new("b").with_metadata("source", "webhook"),
/// ];
///
/// let resolved = fields.resolve(&batch, 1).unwrap();
/// assert_eq!(resolved["topic"], Value::from("events.webhook"));
/// assert_eq!(resolved["partition"], Value::Int(1));
/// ```
#[derive(Debug, Clone)]
pub struct FieldMap {
    fields: Vec<DynamicField>,
    failure_strategy: FailureStrategy,
}

impl FieldMap {
    /// Validate `cfg` and compile every field with the configured backend
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let compiler: Arc<dyn ExpressionCompiler> = match cfg.compiler {
            CompilerType::Cel => Arc::new(CelCompiler::new()),
        };
        Self::with_compiler(cfg, compiler)
    }

    /// Validate `cfg` and compile every field with `compiler`
    pub fn with_compiler(
        cfg: &Config,
        compiler: Arc<dyn ExpressionCompiler>,
    ) -> Result<Self, ConfigError> {
        crate::config::validate_fields(cfg).map_err(ConfigError::Validation)?;

        let fields = cfg
            .fields
            .iter()
            .map(|field| DynamicField::compile(field, &compiler))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            fields,
            failure_strategy: cfg.failure_strategy,
        })
    }

    /// Resolve every field for `batch[index]`.
    ///
    /// With [`FailureStrategy::FailMessage`] the first failing field fails the
    /// whole message. With [`FailureStrategy::ContinueOnError`] failing fields
    /// are logged and left out of the result.
    pub fn resolve(&self, batch: &[Message], index: i64) -> Result<ResolvedFields, FieldError> {
        let mut resolved = ResolvedFields::new();

        for field in &self.fields {
            match field.resolve(batch, index) {
                Ok(value) => {
                    resolved.insert(field.name.clone(), value);
                }
                Err(source) => {
                    FieldResolutionFailed {
                        field: &field.name,
                        index,
                        error: &source,
                    }
                    .log();

                    if self.failure_strategy == FailureStrategy::FailMessage {
                        return Err(FieldError {
                            field: field.name.clone(),
                            source,
                        });
                    }
                }
            }
        }

        Ok(resolved)
    }

    /// Resolve every message of the batch, one result per message in order.
    ///
    /// A failing message never affects its siblings.
    pub fn resolve_batch(&self, batch: &[Message]) -> Vec<Result<ResolvedFields, FieldError>> {
        let started = Instant::now();

        let results: Vec<_> = (0..batch.len())
            .map(|index| self.resolve(batch, index as i64))
            .collect();

        BatchResolved {
            batch_size: batch.len(),
            failed: results.iter().filter(|r| r.is_err()).count(),
            duration: started.elapsed(),
        }
        .log();

        results
    }

    pub fn get(&self, name: &str) -> Option<&DynamicField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn failure_strategy(&self) -> FailureStrategy {
        self.failure_strategy
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
