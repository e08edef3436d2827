// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Conversions from a dynamic [`Value`] into the static types callers ask for.
//!
//! | Target | Accepted sources |
//! |--------|------------------|
//! | `int`    | int, in-range float (truncated toward zero), integer string, bool |
//! | `bool`   | bool, any number (`!= 0`), `true/1/yes/on` and `false/0/no/off/""` (any case) |
//! | `float`  | any number, float string, bool (1.0/0.0) |
//! | `string` | string, any number or bool via its default rendering |
//!
//! Anything else is a [`ConversionError`] naming both the runtime type and the target.

use crate::engine::value::Value;
use crate::errors::ConversionError;

fn unsupported(value: &Value, target: &'static str) -> ConversionError {
    let rendered = match value {
        Value::String(s) => format!("{:?}", s),
        other => other.to_string(),
    };

    ConversionError {
        actual: value.type_name().to_string(),
        value: rendered,
        target,
    }
}

pub fn to_string(value: &Value) -> Result<String, ConversionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(_) | Value::Float(_) | Value::Bool(_) => Ok(value.to_string()),
        Value::Opaque(_) => Err(unsupported(value, "string")),
    }
}

pub fn to_int(value: &Value) -> Result<i64, ConversionError> {
    match value {
        Value::Int(i) => Ok(*i),
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        Value::Float(x) if x.is_finite() && *x >= i64::MIN as f64 && *x < i64::MAX as f64 => {
            Ok(x.trunc() as i64)
        }
        Value::String(s) => s.parse::<i64>().map_err(|_| unsupported(value, "int")),
        Value::Bool(b) => Ok(i64::from(*b)),
        _ => Err(unsupported(value, "int")),
    }
}

pub fn to_bool(value: &Value) -> Result<bool, ConversionError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Float(x) => Ok(*x != 0.0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" | "" => Ok(false),
            _ => Err(unsupported(value, "bool")),
        },
        Value::Opaque(_) => Err(unsupported(value, "bool")),
    }
}

pub fn to_f64(value: &Value) -> Result<f64, ConversionError> {
    match value {
        Value::Float(x) => Ok(*x),
        Value::Int(i) => Ok(*i as f64),
        Value::String(s) => s.parse::<f64>().map_err(|_| unsupported(value, "float")),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Opaque(_) => Err(unsupported(value, "float")),
    }
}
