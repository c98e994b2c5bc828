#![deny(missing_docs)]

//! # Query Command
//!
//! Prints normalized query parameters, one `name=value` per line.

use snippet_graph_core::parse_query;

/// Arguments for the query command.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Raw query string, e.g. `$filter=contains(displayName,'a')&$top=3`.
    pub query: String,
}

/// Renders the normalized parameters.
pub fn render(args: &QueryArgs) -> String {
    parse_query(&args.query)
        .into_iter()
        .map(|(name, value)| format!("{name}={value}\n"))
        .collect()
}

/// Executes the query command.
pub fn execute(args: &QueryArgs) {
    print!("{}", render(args));
}
