// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Default expression backend built on `cel-interpreter`.
//!
//! Expressions use CEL syntax (single- or double-quoted strings, `batch[0]`
//! indexing, member access, arithmetic, comparisons, ternaries). On top of the
//! CEL builtins the environment provides:
//!
//! | Binding | Meaning |
//! |---------|---------|
//! | `payload` | current payload as a string |
//! | `payloadBytes` | current payload as bytes |
//! | `index` | current index in the batch |
//! | `meta(key)` | current metadata value, `""` when missing |
//! | `metas` | current metadata map |
//! | `batch[i].payload` / `.raw` / `.metadata` | sibling message views |
//! | `batch[i].GetHeader(key)` | sibling metadata value, `""` when missing |
//! | `len(x)` | length of a string, bytes, list or map |

mod bindings;
mod compiler;
mod convert;

pub use compiler::{CelCompiler, CelProgram};
