//! Transclude — render partial directives in HTML from the command line.
//!
//! # Usage
//!
//! ```text
//! transclude render <file> [--config <path>] [--channel <name>] [--page <path>] [--param k=v]...
//! transclude inspect <file> [--config <path>] [--channel <name>] [--json]
//! transclude serve [--config <path>] [--bind <ip>] [--port <port>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{inspect::InspectArgs, render::RenderArgs, serve::ServeArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "transclude",
    version,
    about = "Compose HTML pages from {{> partial|data}} directives",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a file's directives and print the result.
    Render(RenderArgs),

    /// List each directive in a file and where it resolves.
    Inspect(InspectArgs),

    /// Serve pages over HTTP with transclusion applied.
    Serve(ServeArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => args.run(),
        Commands::Inspect(args) => args.run(),
        Commands::Serve(args) => args.run(),
    }
}
