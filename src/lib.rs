// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // expression backends
pub mod config;        // dynamic field config + registry
pub mod engine;        // template parsing and evaluation
pub mod errors;        // error handling
pub mod message;       // batch messages
pub mod observability;
pub mod traits;        // compiler abstractions
