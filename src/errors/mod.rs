// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod evaluation;
mod template;

pub use config::{ConfigError, FieldError, ValidationError};
pub use evaluation::{ConversionError, EvalError};
pub use template::{CompileError, ParseError, TemplateError};
