#![deny(missing_docs)]

//! # Code Graph
//!
//! - **models**: Property tree node types and path segments.
//! - **headers**: Header to property mapping.
//! - **assembler**: The immutable `CodeGraph` aggregate and its input.

pub mod assembler;
pub mod headers;
pub mod models;

pub use assembler::{CodeGraph, SnippetRequest};
pub use headers::filter_headers;
pub use models::{CodeProperty, PathSegment, PropertyType};
