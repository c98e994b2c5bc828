#![deny(missing_docs)]

//! # Snippet Graph Core
//!
//! Turns a decoded HTTP request and the OpenAPI schema governing it into a
//! language-neutral code graph that snippet renderers walk to emit source code.

/// Shared error types.
pub mod error;

/// Identifier casing helpers.
pub mod naming;

/// Schema lookup capability (`utoipa`-backed).
pub mod schema;

/// Query string and body parsing.
pub mod parser;

/// Code graph model and assembly.
pub mod graph;

pub use error::{SnippetError, SnippetResult};
pub use graph::{
    filter_headers, CodeGraph, CodeProperty, PathSegment, PropertyType, SnippetRequest,
};
pub use parser::{normalize_query, parse_body, parse_query, BodyParser, ADDITIONAL_DATA};
pub use schema::{SchemaLookup, SchemaView, StringFormat};
