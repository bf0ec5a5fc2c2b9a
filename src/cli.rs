//! CLI argument parsing for the routeweave binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "routeweave", about = "Last-mile CVRPTW routing engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Run pending database migrations and exit
    Migrate,
}
