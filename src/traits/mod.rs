// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod compiler;

pub use compiler::{CompiledProgram, Environment, ExpressionCompiler};
