//! Vignette CLI - batch JPEG thumbnailer for static web galleries.
//!
//! Vignette walks a photo directory, writes a fixed-height JPEG thumbnail for
//! every photo into `thumbs/`, and emits `gallerydata.js` plus an
//! `index.html` viewer that pages through them.
//!
//! # Usage
//!
//! ```bash
//! # Build a gallery for the current directory
//! vignette build
//!
//! # Build a gallery elsewhere with smaller thumbnails
//! vignette build ~/Pictures/2023 --height 150
//!
//! # Keep a machine-readable record of the run
//! vignette build ./photos --report run.jsonl --report-format jsonl
//!
//! # View configuration
//! vignette config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Vignette - batch JPEG thumbnailer for static web galleries.
#[derive(Parser, Debug)]
#[command(name = "vignette")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Use this config file instead of the platform default
    #[arg(long, global = true, env = "VIGNETTE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate thumbnails and gallery data for a photo directory
    Build(cli::build::BuildArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = cli::load_config(cli.config.as_deref())?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Vignette v{}", vignette_core::VERSION);

    match cli.command {
        Commands::Build(args) => cli::build::execute(args, config),
        Commands::Config(args) => cli::config::execute(args, config, cli.config.as_deref()),
    }
}
