// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dynamically typed evaluation results.
//!
//! Every expression backend maps its native results onto this closed set of
//! variants. Anything that is not a scalar (lists, maps, bytes, null, ...) is
//! carried as [`Value::Opaque`] with its backend type name and a textual
//! rendering, so it can still be concatenated into strings.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Opaque(Opaque),
}

/// A backend value with no scalar counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    pub type_name: String,
    pub rendered: String,
}

impl Value {
    /// Runtime type name as it appears in conversion errors.
    pub fn type_name(&self) -> &str {
        match self {
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Opaque(opaque) => &opaque.type_name,
        }
    }

    pub fn opaque(type_name: impl Into<String>, rendered: impl Into<String>) -> Self {
        Value::Opaque(Opaque {
            type_name: type_name.into(),
            rendered: rendered.into(),
        })
    }
}

/// Default textual rendering, used when an expression result is spliced into
/// a multi-segment template.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Opaque(opaque) => f.write_str(&opaque.rendered),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rendering() {
        assert_eq!(Value::from("api").to_string(), "api");
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Float(3.0).to_string(), "3");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::opaque("list", "[1, 2]").to_string(), "[1, 2]");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::opaque("bytes", "b\"x\"").type_name(), "bytes");
    }
}
