#![deny(missing_docs)]

//! # Schema Capability
//!
//! The body parser never walks an OpenAPI document itself. It asks a
//! [`SchemaLookup`] for per-property subschemas, titles, formats and
//! enumerations; [`SchemaView`] answers those questions for `utoipa` schemas.

pub mod view;

pub use view::SchemaView;

/// String formats that change how a JSON string is represented in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFormat {
    /// `format: date-time`
    DateTime,
    /// `format: base64url` (or `contentEncoding: base64url`)
    Base64Url,
}

impl StringFormat {
    /// Maps a raw `format` keyword to a known format (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.eq_ignore_ascii_case("date-time") {
            Some(StringFormat::DateTime)
        } else if keyword.eq_ignore_ascii_case("base64url") {
            Some(StringFormat::Base64Url)
        } else {
            None
        }
    }
}

/// Schema queries consumed while building the code graph.
///
/// Implementations are cheap handles (`Clone`), so lookups return owned values.
pub trait SchemaLookup: Sized + Clone {
    /// Subschema of the declared property `name` (case-sensitive), if any.
    fn property_schema(&self, name: &str) -> Option<Self>;

    /// Declared title.
    fn title(&self) -> Option<String>;

    /// Alternative sub-schemas (`anyOf` / `oneOf` / `allOf` items).
    fn alternatives(&self) -> Vec<Self>;

    /// String format declared directly on this schema.
    fn format(&self) -> Option<StringFormat>;

    /// Whether this schema declares a non-empty `enum`.
    fn is_enumeration(&self) -> bool;

    /// Item schema of an array schema.
    fn items(&self) -> Option<Self>;

    /// Format declared on this schema or, failing that, on one of its alternatives.
    fn string_format(&self) -> Option<StringFormat> {
        self.format()
            .or_else(|| self.alternatives().iter().find_map(|alt| alt.format()))
    }

    /// The schema declaring the enumeration: this one, or the first alternative that does.
    fn enumeration(&self) -> Option<Self> {
        if self.is_enumeration() {
            return Some(self.clone());
        }
        self.alternatives()
            .into_iter()
            .find(|alt| alt.is_enumeration())
    }
}
