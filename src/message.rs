// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single pipeline message: raw payload bytes plus string metadata.
///
/// A batch is any ordered slice of messages (`&[Message]`); templates evaluate
/// against one index of it and may reach sibling messages through `batch[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub payload: Vec<u8>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Message {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            metadata: HashMap::new(),
        }
    }

    /// Builder-style metadata insert.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Metadata lookup where a missing key reads as the empty string.
    pub fn get_metadata(&self, key: &str) -> &str {
        self.metadata.get(key).map(String::as_str).unwrap_or("")
    }
}
