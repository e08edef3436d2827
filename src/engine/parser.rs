// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Template parser.
//!
//! Splits a raw template into an ordered list of literal and expression
//! fragments. Two delimiter forms are recognised:
//!
//! * `${!expr}` - an expression. The closing brace is found by brace-depth
//!   counting starting at depth 1, so `expr` may contain balanced `{` / `}`.
//! * `${{!text}}` - an escaped expression. It ends at the first `}}` (no
//!   nesting) and becomes the literal text `${!text}`; it is never compiled.
//!
//! A `${` followed by anything else is ordinary literal text. Adjacent literal
//! text is merged into one fragment.
//!
//! # Example
//! ```
//! use dagwood_interp::engine::parser::{parse, Fragment};
//!
//! let fragments = parse("topic-${!meta('source')}").unwrap();
//! assert_eq!(fragments, vec![
//!     Fragment::Literal("topic-".to_string()),
//!     Fragment::Expression("meta('source')".to_string()),
//! ]);
//! ```

use std::fmt;

use crate::errors::ParseError;

pub const EXPRESSION_START: &str = "${!";
pub const ESCAPED_START: &str = "${{!";
pub const ESCAPED_END: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Literal(String),
    /// Source text of an expression, without delimiters.
    Expression(String),
}

/// Re-serializes the fragment; for templates without escapes, concatenating
/// every fragment reproduces the original source exactly.
impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Literal(text) => f.write_str(text),
            Fragment::Expression(source) => write!(f, "{}{}}}", EXPRESSION_START, source),
        }
    }
}

pub fn parse(template: &str) -> Result<Vec<Fragment>, ParseError> {
    let mut fragments = Vec::new();
    let mut literal = String::new();
    let mut rest_start = 0;
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find("${") {
        let start = cursor + offset;
        let tail = &template[start..];

        if tail.starts_with(ESCAPED_START) {
            let body_start = start + ESCAPED_START.len();
            let body_len = template[body_start..]
                .find(ESCAPED_END)
                .ok_or(ParseError::UnclosedEscape { position: start })?;

            literal.push_str(&template[rest_start..start]);
            literal.push_str(EXPRESSION_START);
            literal.push_str(&template[body_start..body_start + body_len]);
            literal.push('}');

            cursor = body_start + body_len + ESCAPED_END.len();
            rest_start = cursor;
        } else if tail.starts_with(EXPRESSION_START) {
            let body_start = start + EXPRESSION_START.len();
            let body_end = find_matching_brace(template, body_start)
                .ok_or(ParseError::UnclosedExpression { position: start })?;

            literal.push_str(&template[rest_start..start]);
            if !literal.is_empty() {
                fragments.push(Fragment::Literal(std::mem::take(&mut literal)));
            }
            fragments.push(Fragment::Expression(
                template[body_start..body_end].to_string(),
            ));

            cursor = body_end + 1;
            rest_start = cursor;
        } else {
            // Plain `${`; resume right after the `$` so an overlapping
            // marker such as `${${!x}` is still found.
            cursor = start + 1;
        }
    }

    literal.push_str(&template[rest_start..]);
    if !literal.is_empty() {
        fragments.push(Fragment::Literal(literal));
    }

    Ok(fragments)
}

/// Byte index of the `}` that brings the depth from 1 back to 0.
fn find_matching_brace(template: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, b) in template.as_bytes()[from..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}
