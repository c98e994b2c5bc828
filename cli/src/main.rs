#![deny(missing_docs)]

//! # Snippet Graph CLI
//!
//! Command Line Interface over the snippet graph core.
//!
//! Supported Commands:
//! - `graph`: Builds the code graph for a request description and prints it as JSON.
//! - `query`: Prints the normalized parameters of a query string.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::CliResult;

mod error;
mod graph;
mod query;

#[derive(Parser, Debug)]
#[clap(author, version, about = "HTTP request -> code graph for snippet generation")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins when set.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the code graph of a request description file.
    Graph(graph::GraphArgs),
    /// Normalize a raw query string.
    Query(query::QueryArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Graph(args) => graph::execute(args)?,
        Commands::Query(args) => query::execute(args),
    }

    Ok(())
}
