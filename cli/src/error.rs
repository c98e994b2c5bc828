#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use snippet_graph_core::SnippetError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// The request could not be turned into a code graph.
    #[display("Snippet Error: {}", _0)]
    Snippet(SnippetError),

    /// General failure message (decoding, encoding, missing files).
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `General(String)`
/// variant contains a `String`, which does not implement `std::error::Error`.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_error_conversion() {
        let err: CliError = SnippetError::UnexpectedJsonShape("array".into()).into();
        assert!(matches!(err, CliError::Snippet(_)));
        assert_eq!(
            format!("{}", err),
            "Snippet Error: Unexpected JSON shape: array"
        );
    }

    #[test]
    fn test_string_conversion() {
        let err: CliError = String::from("bad file").into();
        assert!(matches!(err, CliError::General(ref s) if s == "bad file"));
    }
}
