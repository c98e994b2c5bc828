#![deny(missing_docs)]

//! # Lenient JSON
//!
//! `serde_json` rejects trailing commas; request bodies pasted from docs often
//! carry them. Commas directly before `}` or `]` are dropped before parsing.
//!
//! Bodies are parsed into [`JsonValue`], which keeps number literals as written
//! so integers wider than 64 bits survive unchanged.

use crate::error::{SnippetError, SnippetResult};
use indexmap::IndexMap;
use serde_json::value::RawValue;
use std::borrow::Cow;

/// Nesting limit for [`JsonValue`] trees, matching `serde_json`'s recursion limit.
const MAX_NESTING: usize = 128;

/// Decimal digits an `f64` always carries without loss.
const F64_EXACT_DIGITS: usize = 15;

/// A parsed JSON value. Members keep source order; numbers keep canonical text.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Canonical decimal text, see [`canonical_number`].
    Number(String),
    /// Unescaped string contents.
    String(String),
    /// Elements in source order.
    Array(Vec<JsonValue>),
    /// Members in source order; a repeated key keeps its first position and last value.
    Object(IndexMap<String, JsonValue>),
}

impl JsonValue {
    /// JSON kind name, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }
}

/// Parses `input` as JSON, tolerating trailing commas in objects and arrays.
pub fn parse_lenient(input: &str) -> SnippetResult<JsonValue> {
    let cleaned = strip_trailing_commas(input);
    let raw: Box<RawValue> = serde_json::from_str(&cleaned)?;
    from_raw(&raw, 0)
}

fn from_raw(raw: &RawValue, depth: usize) -> SnippetResult<JsonValue> {
    let text = raw.get().trim();
    match text.as_bytes().first() {
        Some(b'{') | Some(b'[') if depth >= MAX_NESTING => Err(
            SnippetError::UnexpectedJsonShape(format!("nesting deeper than {MAX_NESTING} levels")),
        ),
        Some(b'{') => {
            let members: IndexMap<String, Box<RawValue>> = serde_json::from_str(text)?;
            members
                .into_iter()
                .map(|(key, value)| from_raw(&value, depth + 1).map(|member| (key, member)))
                .collect::<SnippetResult<IndexMap<_, _>>>()
                .map(JsonValue::Object)
        }
        Some(b'[') => {
            let items: Vec<Box<RawValue>> = serde_json::from_str(text)?;
            items
                .iter()
                .map(|item| from_raw(item, depth + 1))
                .collect::<SnippetResult<Vec<_>>>()
                .map(JsonValue::Array)
        }
        Some(b'"') => Ok(JsonValue::String(serde_json::from_str(text)?)),
        Some(b't') | Some(b'f') => Ok(JsonValue::Bool(serde_json::from_str(text)?)),
        Some(b'n') => Ok(JsonValue::Null),
        Some(b'-') | Some(b'0'..=b'9') => Ok(JsonValue::Number(canonical_number(text))),
        _ => Err(SnippetError::UnsupportedValueKind(text.to_string())),
    }
}

/// Canonical text of a JSON number literal.
///
/// Integers keep their digits as written (JSON already forbids leading zeros
/// and `+`). Fractions and exponents use the shortest `f64` form when it holds
/// the exact value (`3.00` -> `3.0`, `-1.5e3` -> `-1500.0`), otherwise the
/// literal is kept.
pub fn canonical_number(literal: &str) -> String {
    if !literal.contains(['.', 'e', 'E']) {
        return literal.to_string();
    }

    let digits = significant_digits(literal);
    literal
        .parse::<f64>()
        .ok()
        .filter(|f| digits <= F64_EXACT_DIGITS && (f.is_normal() || (*f == 0.0 && digits == 0)))
        .and_then(serde_json::Number::from_f64)
        .map(|n| n.to_string())
        .unwrap_or_else(|| literal.to_string())
}

/// Significant digits of the mantissa, ignoring sign, point and padding zeros.
fn significant_digits(literal: &str) -> usize {
    let mantissa = literal.split(['e', 'E']).next().unwrap_or(literal);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}

/// Removes commas that are followed only by whitespace and a closing bracket.
/// String literals are left untouched.
pub fn strip_trailing_commas(input: &str) -> Cow<'_, str> {
    if !input.contains(',') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in input.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            out.push(c);
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' if closes_next(&input[idx + 1..]) => {}
            _ => out.push(c),
        }
    }

    Cow::Owned(out)
}

fn closes_next(rest: &str) -> bool {
    matches!(rest.trim_start().chars().next(), Some('}') | Some(']'))
}
