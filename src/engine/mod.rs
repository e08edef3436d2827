// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Template engine: parsing, evaluation contexts, evaluation and type coercion.
//!
//! ```text
//! template ──parse──▶ fragments ──compile──▶ Evaluator ──eval(batch, i)──▶ Value ──coerce──▶ T
//!                                              (once)        (per message)
//! ```

pub mod coercion;
pub mod context;
pub mod evaluator;
pub mod interpolated;
pub mod parser;
pub mod value;


pub use context::{EvaluationContext, ExpressionContext, MessageView};
pub use evaluator::{Evaluator, Segment};
pub use interpolated::{InterpolatedTemplate, Resolver};
pub use value::{Opaque, Value};
