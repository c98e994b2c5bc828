//! # Error Handling
//!
//! Provides the `SnippetError` enum returned while building a code graph.
//! Every failure is deterministic for a given input; nothing here is retried.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Only `serde_json::Error` converts implicitly (into `MalformedJson`).
#[derive(Debug, Display, From)]
pub enum SnippetError {
    /// The body is non-empty but was flagged as not parseable for its content type.
    #[from(ignore)]
    #[display("Unsupported content type: {_0}")]
    UnsupportedContentType(String),

    /// The body failed to parse as JSON, even with trailing commas tolerated.
    #[display("Malformed JSON body: {_0}")]
    MalformedJson(serde_json::Error),

    /// A position that must hold a JSON object holds another kind of value.
    #[from(ignore)]
    #[display("Unexpected JSON shape: {_0}")]
    UnexpectedJsonShape(String),

    /// A JSON value kind the graph has no node type for.
    #[from(ignore)]
    #[display("Unsupported JSON value kind: {_0}")]
    UnsupportedValueKind(String),
}

/// Manual implementation of the standard Error trait.
///
/// The `String` payloads do not implement `Error`, so `source` is spelled out.
impl std::error::Error for SnippetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnippetError::MalformedJson(e) => Some(e),
            _ => None,
        }
    }
}

/// Helper type alias for Result using SnippetError.
pub type SnippetResult<T> = Result<T, SnippetError>;
