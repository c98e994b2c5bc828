#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helpers for deriving identifier-safe names and literals for snippet renderers.

/// Upper-cases the first character and leaves the rest untouched.
///
/// e.g. `importance` -> `Importance`, `sendMail` -> `SendMail`
pub fn to_first_upper(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character and leaves the rest untouched.
///
/// e.g. `DisplayName` -> `displayName`
pub fn to_first_lower(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Naive singular form: drops one trailing `s`.
pub fn singularize(s: &str) -> &str {
    s.strip_suffix('s').unwrap_or(s)
}

/// Escapes `"`, `\n` and `\r` so the text can be embedded in a generated string literal.
pub fn escape_string_literal(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}
