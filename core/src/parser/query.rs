#![deny(missing_docs)]

//! # Query String Normalization
//!
//! Turns a raw query string into `(name, value)` pairs that are safe to use as
//! identifiers and literals in generated code:
//!
//! - OData function filters (`contains(name,'x')`) are lifted out before the
//!   `key=value&...` split, so their commas survive.
//! - `$`-prefixed system parameters lose the `$` and start lower-case.
//! - Boolean and integer values are canonicalized.
//!
//! Known limitation: a function's arguments end at the first `)`, so quoted
//! arguments containing `)` or nested calls are cut short.

use crate::graph::{CodeProperty, PropertyType};
use crate::naming::to_first_lower;
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use tracing::trace;
use url::form_urlencoded;

/// Normalized query parameters as `String` properties, in input order.
pub fn normalize_query(query: &str) -> Vec<CodeProperty> {
    parse_query(query)
        .into_iter()
        .map(|(name, value)| CodeProperty::leaf(Some(name), PropertyType::String, Some(value)))
        .collect()
}

/// Normalized `(name, value)` pairs, in input order.
///
/// e.g. `$filter=contains(displayName,'a')&$top=3`
/// -> `[("filter", "contains(displayName,'a')"), ("top", "3")]`
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    if query.trim().is_empty() {
        return Vec::new();
    }

    let (residual, calls) = extract_function_calls(query);
    if !calls.is_empty() {
        trace!(functions = calls.len(), "lifted function calls from query");
    }

    form_urlencoded::parse(residual.as_bytes())
        .map(|(key, value)| (normalize_key(&key), normalize_value(&value, &calls)))
        .collect()
}

/// Finds every `identifier(arguments)` and removes the `(arguments)` part.
///
/// Returns the residual string and `identifier -> "(arguments)"`.
fn extract_function_calls(query: &str) -> (String, IndexMap<String, String>) {
    let mut residual = String::with_capacity(query.len());
    let mut calls = IndexMap::new();
    let mut copied_to = 0;
    let mut ident_start: Option<usize> = None;
    let mut chars = query.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            if ident_start.is_none() {
                ident_start = Some(idx);
            }
            continue;
        }

        if c == '(' {
            if let (Some(start), Some(len)) = (ident_start, query[idx..].find(')')) {
                let close = idx + len;
                calls.insert(
                    query[start..idx].to_string(),
                    query[idx..=close].to_string(),
                );
                residual.push_str(&query[copied_to..idx]);
                copied_to = close + 1;
                while chars.next_if(|&(i, _)| i <= close).is_some() {}
            }
        }
        ident_start = None;
    }

    residual.push_str(&query[copied_to..]);
    (residual, calls)
}

fn normalize_key(key: &str) -> String {
    let key = key.strip_prefix('$').unwrap_or(key);
    to_first_lower(&percent_decode_str(key).decode_utf8_lossy())
}

fn normalize_value(value: &str, calls: &IndexMap<String, String>) -> String {
    let decoded = percent_decode_str(value).decode_utf8_lossy();

    if decoded.eq_ignore_ascii_case("true") || decoded.eq_ignore_ascii_case("false") {
        return decoded.to_ascii_lowercase();
    }
    if let Ok(number) = decoded.trim().parse::<i64>() {
        return number.to_string();
    }

    decoded
        .split(',')
        .map(|token| match calls.get(token) {
            Some(arguments) => format!("{token}{arguments}"),
            None => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}
