//! Arbor CLI - content tree browser.
//!
//! Provides commands for:
//! - `serve`: Serve the content tree as HTML pages
//! - `show`: Resolve one path and print the screen
//! - `browse`: Browse the content tree interactively

mod commands;
mod error;
mod output;
mod screen;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BrowseArgs, ServeArgs, ShowArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Arbor - content tree browser.
#[derive(Parser)]
#[command(name = "arbor", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the content tree over HTTP.
    Serve(ServeArgs),
    /// Resolve a path and print the resulting screen.
    Show(ShowArgs),
    /// Browse the content tree interactively.
    Browse(BrowseArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for serve command
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute(VERSION))
        }
        Commands::Show(args) => current_thread_runtime().block_on(args.execute()),
        Commands::Browse(args) => current_thread_runtime().block_on(args.execute()),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Single-threaded runtime for the interactive commands.
fn current_thread_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime")
}
