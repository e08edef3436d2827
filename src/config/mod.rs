// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod field_map;
mod loader;
mod validation;


pub use field_map::{DynamicField, FieldEvaluator, FieldMap, ResolvedFields};
pub use loader::{
    load_and_validate_config, load_config, CompilerType, Config, FailureStrategy, FieldConfig,
    FieldKind, FieldScope,
};
pub use validation::validate_fields;
