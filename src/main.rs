//! uploader-enumerator - List the files of a register folder that should be uploaded
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use uploader_enumerator::cli::{commands, Cli};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    match commands::enumerate::execute(&cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout is reserved for the JSON result
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
