#![deny(missing_docs)]

//! # Request Parsing
//!
//! - **query**: Query string normalization (OData-aware).
//! - **json**: JSON parsing tolerant of trailing commas.
//! - **body**: Schema-guided body walk producing the property tree.

pub mod body;
pub mod json;
pub mod query;

pub use body::{parse_body, BodyParser, ADDITIONAL_DATA};
pub use query::{normalize_query, parse_query};
