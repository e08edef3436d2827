// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Builds a CEL `Context` from an evaluation environment.
//!
//! Sibling views are plain CEL maps. `GetHeader` is a single method-style
//! function that reads the `metadata` entry of whatever view it is called on,
//! so no view carries its own closure.

use std::collections::HashMap;
use std::sync::Arc;

use cel_interpreter::extractors::This;
use cel_interpreter::objects::{Key, Map};
use cel_interpreter::{Context, ExecutionError, Value as CelValue};

use super::convert::{string, string_map, to_cel};
use crate::engine::context::{EvaluationContext, ExpressionContext, MessageView};

const METADATA_FIELD: &str = "metadata";

fn key(name: &str) -> Key {
    Key::String(Arc::new(name.to_string()))
}

fn view_value(view: &MessageView<'_>) -> CelValue {
    let mut fields = HashMap::new();
    fields.insert(key("payload"), string(&view.payload));
    fields.insert(key("raw"), CelValue::Bytes(Arc::new(view.raw.to_vec())));
    fields.insert(key(METADATA_FIELD), string_map(view.metadata));

    CelValue::Map(Map {
        map: Arc::new(fields),
    })
}

pub(super) fn bind_batch(context: &mut Context, ctx: &EvaluationContext<'_>) {
    let views: Vec<CelValue> = ctx.batch().iter().map(view_value).collect();

    context.add_variable_from_value("payload", string(ctx.payload()));
    context.add_variable_from_value(
        "payloadBytes",
        CelValue::Bytes(Arc::new(ctx.payload_bytes().to_vec())),
    );
    context.add_variable_from_value("index", CelValue::Int(ctx.index() as i64));
    context.add_variable_from_value("metas", string_map(ctx.metas()));
    context.add_variable_from_value("batch", CelValue::List(Arc::new(views)));

    install_functions(context, ctx.metas().clone());
}

pub(super) fn bind_vars(context: &mut Context, ctx: &ExpressionContext) {
    for (name, value) in ctx.vars() {
        context.add_variable_from_value(name.clone(), to_cel(value));
    }
    context.add_variable_from_value("metas", string_map(ctx.metas()));

    install_functions(context, ctx.metas().clone());
}

fn install_functions(context: &mut Context, metadata: HashMap<String, String>) {
    let metadata = Arc::new(metadata);

    context.add_function(
        "meta",
        move |name: Arc<String>| -> Result<CelValue, ExecutionError> {
            Ok(string(
                metadata.get(name.as_str()).map(String::as_str).unwrap_or(""),
            ))
        },
    );
    context.add_function("GetHeader", get_header);
    context.add_function("len", len);
}

fn get_header(
    This(view): This<CelValue>,
    name: Arc<String>,
) -> Result<CelValue, ExecutionError> {
    let CelValue::Map(view) = view else {
        return Err(ExecutionError::function_error(
            "GetHeader",
            "target must be a batch message",
        ));
    };

    match view.map.get(&key(METADATA_FIELD)) {
        Some(CelValue::Map(metadata)) => Ok(metadata
            .map
            .get(&Key::String(name))
            .cloned()
            .unwrap_or_else(|| string(""))),
        _ => Err(ExecutionError::function_error(
            "GetHeader",
            "target has no metadata",
        )),
    }
}

fn len(value: CelValue) -> Result<CelValue, ExecutionError> {
    let length = match &value {
        CelValue::String(s) => s.chars().count(),
        CelValue::Bytes(b) => b.len(),
        CelValue::List(items) => items.len(),
        CelValue::Map(map) => map.map.len(),
        other => {
            return Err(ExecutionError::function_error(
                "len",
                format!("unsupported argument {:?}", other),
            ))
        }
    };

    Ok(CelValue::Int(length as i64))
}
