// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Expression backends for template evaluation.
//!
//! A backend implements [`ExpressionCompiler`](crate::traits::ExpressionCompiler):
//! it turns the source text between `${!` and `}` into a
//! [`CompiledProgram`](crate::traits::CompiledProgram) that can be executed any
//! number of times, from any thread, against an evaluation environment.
//!
//! # Available Backends
//!
//! ## CEL Backend
//! The default. Expressions are CEL programs (via `cel-interpreter`) with the
//! message bindings `payload`, `index`, `meta()`, `metas`, `batch` and friends
//! installed on every execution.
//!
//! ## Stub Backend (Test-Only)
//! A counting compiler for tests that need to observe how often templates are
//! compiled and executed, and to simulate compile or runtime failures.
//! NOT available in production builds.
//!
//! # Example
//! ```rust
//! use dagwood_interp::backends::cel::CelCompiler;
//! use dagwood_interp::engine::Evaluator;
//! use dagwood_interp::message::Message;
//!
//! let evaluator = Evaluator::with_compiler("id-${!index}", &CelCompiler::new())?;
//! let batch = vec![Message::new("a"), Message::new("b")];
//! assert_eq!(evaluator.eval_string(&batch, 1)?, "id-1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cel;
#[cfg(test)]
pub mod stub;
