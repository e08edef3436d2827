// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Evaluation environments.
//!
//! [`EvaluationContext`] is the batch-aware environment used by
//! [`Evaluator`](crate::engine::Evaluator). It is built fresh for every call and
//! borrows from the batch it was built over, so it owns no long-lived state.
//! The per-message views are snapshotted up front into an immutable array;
//! no view shares anything mutable with another. Whatever an expression
//! backend derives from that snapshot is kept in a [`BindingCache`] so every
//! expression of one evaluation shares a single bound environment.
//!
//! [`ExpressionContext`] is the plain key/value environment used by the
//! single-message [`InterpolatedTemplate`](crate::engine::InterpolatedTemplate).

use std::any::Any;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;

use crate::engine::value::Value;
use crate::errors::EvalError;
use crate::message::Message;

/// Read-only view of one message in the batch (`batch[i]` inside expressions).
#[derive(Debug, Clone)]
pub struct MessageView<'a> {
    pub payload: Cow<'a, str>,
    pub raw: &'a [u8],
    pub metadata: &'a HashMap<String, String>,
}

impl<'a> MessageView<'a> {
    fn of(message: &'a Message) -> Self {
        Self {
            payload: String::from_utf8_lossy(&message.payload),
            raw: &message.payload,
            metadata: &message.metadata,
        }
    }

    /// Header lookup; a missing key reads as `""`.
    pub fn header(&self, key: &str) -> &str {
        self.metadata.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Backend bindings built at most once per [`EvaluationContext`].
///
/// The first program executed against a context fills the cache; the
/// remaining expressions of the same evaluation reuse it.
#[derive(Default)]
pub struct BindingCache(OnceCell<Box<dyn Any>>);

impl BindingCache {
    /// Returns the cached bindings, building them with `init` on first use.
    ///
    /// `None` when the cache already holds bindings of another type.
    pub fn get_or_init<T: Any>(&self, init: impl FnOnce() -> T) -> Option<&T> {
        self.0
            .get_or_init(|| Box::new(init()) as Box<dyn Any>)
            .downcast_ref::<T>()
    }

    pub fn is_filled(&self) -> bool {
        self.0.get().is_some()
    }
}

/// Cloning starts from an empty cache.
impl Clone for BindingCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for BindingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingCache")
            .field("filled", &self.is_filled())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    index: usize,
    batch: Vec<MessageView<'a>>,
    bindings: BindingCache,
}

impl<'a> EvaluationContext<'a> {
    /// Build the environment for `batch[index]`.
    ///
    /// An empty batch is rejected before the index is looked at; a negative
    /// index and an index past the end are reported separately.
    pub fn build(batch: &'a [Message], index: i64) -> Result<Self, EvalError> {
        let index = check_index(batch.len(), index)?;

        Ok(Self {
            index,
            batch: batch.iter().map(MessageView::of).collect(),
            bindings: BindingCache::default(),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn current(&self) -> &MessageView<'a> {
        &self.batch[self.index]
    }

    pub fn payload(&self) -> &str {
        &self.current().payload
    }

    pub fn payload_bytes(&self) -> &[u8] {
        self.current().raw
    }

    /// `meta(key)`: never absent, a missing key is `""`.
    pub fn meta(&self, key: &str) -> &str {
        self.current().header(key)
    }

    /// `metas`: the full metadata map of the current message.
    pub fn metas(&self) -> &HashMap<String, String> {
        self.current().metadata
    }

    pub fn batch(&self) -> &[MessageView<'a>] {
        &self.batch
    }

    pub fn bindings(&self) -> &BindingCache {
        &self.bindings
    }
}

/// Validates `index` against a batch of `len` messages.
pub fn check_index(len: usize, index: i64) -> Result<usize, EvalError> {
    if len == 0 {
        return Err(EvalError::EmptyBatch);
    }
    if index < 0 {
        return Err(EvalError::NegativeIndex { index });
    }

    let position = index as usize;
    if position >= len {
        return Err(EvalError::IndexOutOfBounds { index, size: len });
    }
    Ok(position)
}

/// Plain key/value environment for single-message evaluation.
///
/// Variables are bound by name; `meta(key)` and `metas` read from the
/// separate metadata map.
#[derive(Debug, Clone, Default)]
pub struct ExpressionContext {
    vars: HashMap<String, Value>,
    metadata: HashMap<String, String>,
}

impl ExpressionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for one message: binds `payload`, `index`, and its metadata.
    pub fn for_message(message: &Message, index: usize) -> Self {
        Self::new()
            .with_var(
                "payload",
                String::from_utf8_lossy(&message.payload).into_owned(),
            )
            .with_var("index", index as i64)
            .with_metadata(message.metadata.clone())
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn vars(&self) -> &HashMap<String, Value> {
        &self.vars
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn meta(&self, key: &str) -> &str {
        self.metadata.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn metas(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}
