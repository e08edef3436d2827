// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic line is a small message struct implementing `Display`
//! plus [`StructuredLog`](messages::StructuredLog), which emits it at a fixed
//! level with structured fields. This keeps message text out of call sites
//! and keeps the fields consistent between logs and spans.
//!
//! # Usage
//!
//! ```rust
//! use dagwood_interp::observability::messages::template::TemplateCompiled;
//! use dagwood_interp::observability::messages::StructuredLog;
//!
//! let msg = TemplateCompiled {
//!     template: "events.${!meta('source')}",
//!     compiler: "cel",
//!     expression_count: 1,
//! };
//!
//! msg.log();
//! ```

pub mod messages;
