//! graybatch CLI - batch PNG to grayscale conversion.
//!
//! Reads every `*.png` directly inside the input directory and writes a
//! grayscale copy with the same name into the output directory. The first
//! run in a fresh directory only creates `./input/` and exits.
//!
//! # Usage
//!
//! ```bash
//! # Convert ./input/*.png into ./output/
//! graybatch
//!
//! # Custom directories, four workers, keep going past broken files
//! graybatch convert -i scans/ -o scans-gray/ -p 4 --on-error isolate
//!
//! # View configuration
//! graybatch config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// graybatch - Convert a directory of PNG images to grayscale.
#[derive(Parser, Debug)]
#[command(name = "graybatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "GRAYBATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert every PNG in the input directory (the default command)
    Convert(cli::convert::ConvertArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `graybatch config path`."
            );
            graybatch_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("graybatch v{}", graybatch_core::VERSION);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Convert(cli::convert::ConvertArgs::default()));

    let result = match command {
        Commands::Convert(args) => cli::convert::execute(args, cli.config.as_deref()).await,
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()).await,
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        // Exit right away; in-flight conversions are abandoned, not awaited.
        std::process::exit(1);
    }
}
