#![deny(missing_docs)]

//! # Header Filtering
//!
//! Request headers become `String` properties. `Host` is dropped: it belongs
//! to the transport and never appears in generated snippets.

use crate::graph::{CodeProperty, PropertyType};
use indexmap::IndexMap;

const HOST: &str = "Host";

/// Maps headers to `String` properties carrying their first value, in input order.
pub fn filter_headers(headers: &IndexMap<String, Vec<String>>) -> Vec<CodeProperty> {
    headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case(HOST))
        .map(|(name, values)| {
            CodeProperty::leaf(
                Some(name.clone()),
                PropertyType::String,
                values.first().cloned(),
            )
        })
        .collect()
}
