//! The `vignette build` command for generating a gallery.

mod batch;

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use vignette_core::{Config, ProcessOptions, ReportFormat, Vignette};

use batch::run_batch;

/// Arguments for the `build` command.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Gallery root (defaults to `gallery.source_root` from the config)
    pub root: Option<PathBuf>,

    /// Thumbnail height in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// JPEG quality for thumbnails (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Thumbnails per gallery page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Reuse thumbnails that already exist instead of re-encoding them
    #[arg(long)]
    pub skip_existing: bool,

    /// Write a per-file report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    pub report_format: ReportFormatArg,
}

/// Report formats accepted on the command line.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ReportFormatArg {
    /// One JSON array
    #[default]
    Json,
    /// One JSON object per line
    Jsonl,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Json => ReportFormat::Json,
            ReportFormatArg::Jsonl => ReportFormat::JsonLines,
        }
    }
}

/// Execute the build command.
pub fn execute(args: BuildArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    let vignette = Vignette::new(config)?;

    let files = vignette.discover()?;
    if files.is_empty() {
        tracing::warn!("No photos found under {:?}", vignette.config().source_root());
    } else {
        tracing::info!("Found {} photo(s) to process", files.len());
    }

    let options = ProcessOptions {
        skip_existing: args.skip_existing,
    };
    let summary = run_batch(&vignette, &files, &options, &args)?;

    if summary.failed() > 0 && summary.succeeded() == 0 {
        anyhow::bail!("All {} photo(s) failed to process", summary.failed());
    }
    Ok(())
}

/// Layer command-line flags over the loaded configuration.
fn apply_overrides(mut config: Config, args: &BuildArgs) -> Config {
    if let Some(root) = &args.root {
        config.gallery.source_root = root.clone();
    }
    if let Some(height) = args.height {
        config.thumbnail.target_height = height;
    }
    if let Some(quality) = args.quality {
        config.thumbnail.jpeg_quality = quality;
    }
    if let Some(page_size) = args.page_size {
        config.gallery.page_size = page_size;
    }
    config
}
