// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use cel_interpreter::objects::{Key, Map};
use cel_interpreter::Value as CelValue;

use crate::engine::value::Value;

pub(super) fn string(s: &str) -> CelValue {
    CelValue::String(Arc::new(s.to_string()))
}

pub(super) fn string_map(entries: &HashMap<String, String>) -> CelValue {
    let map: HashMap<Key, CelValue> = entries
        .iter()
        .map(|(k, v)| (Key::String(Arc::new(k.clone())), string(v)))
        .collect();

    CelValue::Map(Map { map: Arc::new(map) })
}

pub(super) fn to_cel(value: &Value) -> CelValue {
    match value {
        Value::String(s) => string(s),
        Value::Int(i) => CelValue::Int(*i),
        Value::Float(x) => CelValue::Float(*x),
        Value::Bool(b) => CelValue::Bool(*b),
        Value::Opaque(opaque) => string(&opaque.rendered),
    }
}

/// Maps a CEL result onto the closed `Value` set.
pub(super) fn from_cel(value: CelValue) -> Value {
    match value {
        CelValue::Int(i) => Value::Int(i),
        CelValue::UInt(u) => i64::try_from(u)
            .map(Value::Int)
            .unwrap_or(Value::Float(u as f64)),
        CelValue::Float(x) => Value::Float(x),
        CelValue::Bool(b) => Value::Bool(b),
        CelValue::String(s) => Value::String(s.to_string()),
        other => Value::opaque(type_name(&other), render(&other)),
    }
}

fn type_name(value: &CelValue) -> &'static str {
    match value {
        CelValue::Bytes(_) => "bytes",
        CelValue::List(_) => "list",
        CelValue::Map(_) => "map",
        CelValue::Null => "null",
        _ => "opaque",
    }
}

fn render(value: &CelValue) -> String {
    match value {
        CelValue::String(s) => s.to_string(),
        CelValue::Int(i) => i.to_string(),
        CelValue::UInt(u) => u.to_string(),
        CelValue::Float(x) => x.to_string(),
        CelValue::Bool(b) => b.to_string(),
        CelValue::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        CelValue::Null => "null".to_string(),
        CelValue::List(items) => {
            let items: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", items.join(", "))
        }
        CelValue::Map(map) => {
            // sorted so the rendering does not depend on hash order
            let mut entries: Vec<String> = map
                .map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_key(k), render(v)))
                .collect();
            entries.sort();
            format!("{{{}}}", entries.join(", "))
        }
        other => format!("{:?}", other),
    }
}

fn render_key(key: &Key) -> String {
    match key {
        Key::Int(i) => i.to_string(),
        Key::Uint(u) => u.to_string(),
        Key::Bool(b) => b.to_string(),
        Key::String(s) => s.to_string(),
    }
}
