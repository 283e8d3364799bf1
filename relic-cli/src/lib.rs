//! Command-line interface for querying a relic catalogue.
//!
//! The `relic` binary maps the engine's four read operations onto
//! subcommands: `points` (viewport), `nearby` (radius), `search` (free
//! text), and `nearest` (closest heritage site). Each subcommand's options
//! merge CLI flags, environment variables, and configuration files; results
//! are printed as JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod commands;
mod error;

pub use error::CliError;

/// Run the relic CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration merging, the
/// catalogue store, or the query itself fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Points(args) => commands::points(args),
        Command::Nearby(args) => commands::nearby(args),
        Command::Search(args) => commands::search(args),
        Command::Nearest(args) => commands::nearest(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "relic",
    about = "Query museums and heritage sites from a relic catalogue",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List markers inside a map viewport.
    Points(commands::PointsArgs),
    /// List markers around a coordinate, closest first.
    Nearby(commands::NearbyArgs),
    /// Search markers by keyword.
    Search(commands::SearchArgs),
    /// Find the closest heritage site to a coordinate.
    Nearest(commands::NearestArgs),
}
