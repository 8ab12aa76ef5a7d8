//! cudakit - CUDA toolkit and cuDNN provisioning for CI hosts
//!
//! This is the main entry point for the cudakit command-line interface.

mod ci_env;
mod cli;
mod commands;
mod output;
mod version;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    // Run command
    let result = match cli.command {
        Commands::Install(args) => commands::install::run(args).await,
        Commands::Versions(args) => commands::versions::run(args),
        Commands::Version(args) => commands::version::run(args),
    };

    // Any uncaught failure becomes one user-visible failed-run signal
    if let Err(error) = result {
        let message = format!("{error:#}");
        if message.trim().is_empty() {
            output::error("Unknown error");
        } else {
            output::error(&message);
        }
        std::process::exit(1);
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Default to info level to show provisioning progress
            // Use --quiet to suppress, or -v/-vv for more detail
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
