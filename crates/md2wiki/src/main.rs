//! md2wiki CLI - Markdown to Confluence wiki markup converter.
//!
//! Usage: `md2wiki [OPTIONS] <INPUT> <OUTPUT>`
//!
//! Reads a Markdown file, converts it to Confluence wiki markup and writes
//! the result to the output file, replacing any existing content.

mod commands;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use commands::ConvertArgs;
use error::CliError;
use output::Output;

/// md2wiki - Convert Markdown to Confluence wiki markup.
#[derive(Parser)]
#[command(
    name = "md2wiki",
    version,
    about,
    override_usage = "md2wiki [OPTIONS] <INPUT> <OUTPUT>"
)]
struct Cli {
    #[command(flatten)]
    args: ConvertArgs,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.args.execute() {
        Ok(()) => {}
        Err(CliError::Usage) => {
            output.info(&Cli::command().render_usage().to_string());
            std::process::exit(1);
        }
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::exit(1);
        }
    }
}
