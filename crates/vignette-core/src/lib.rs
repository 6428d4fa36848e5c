//! Vignette Core - thumbnail gallery generation library.
//!
//! Vignette walks a directory of JPEG photos, writes a small JPEG thumbnail
//! for each one into a content-addressed folder, and emits the data file a
//! static HTML viewer pages through.
//!
//! # Architecture
//!
//! Every photo runs through the same synchronous pipeline, one at a time:
//!
//! ```text
//! Discover → Validate → Coarse decode (1/2/4/8) → Bilinear resample → Encode → gallerydata.js
//! ```
//!
//! A failure in any stage is scoped to that file: it is logged, recorded in
//! the [`BuildSummary`], and the batch moves on.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vignette_core::{Config, ProcessOptions, Vignette};
//!
//! fn main() -> vignette_core::Result<()> {
//!     let mut config = Config::load()?;
//!     config.gallery.source_root = "./photos".into();
//!     let vignette = Vignette::new(config)?;
//!
//!     let summary = vignette.build(&ProcessOptions::default())?;
//!     println!("{} thumbnails, {} failures", summary.succeeded(), summary.failed());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod gallery;
pub mod output;
pub mod pipeline;
pub mod types;

#[cfg(test)]
mod test_util;

pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult, Result, VignetteError};
pub use gallery::{GalleryEntry, GalleryWriter};
pub use output::{ReportFormat, ReportWriter};
pub use pipeline::{DiscoveredFile, FileDiscovery, ProcessOptions, ThumbnailProcessor};
pub use types::{BuildSummary, ColorSpace, FailedFile, Image, ProcessedThumbnail};

use std::path::PathBuf;
use std::time::Instant;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gallery builder - the main entry point.
pub struct Vignette {
    config: Config,
}

impl Vignette {
    /// Create a builder after validating `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        tracing::debug!("Initializing Vignette v{}", VERSION);
        Ok(Self { config })
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute gallery root. Fails if it does not exist.
    pub fn root(&self) -> Result<PathBuf> {
        let root = self.config.source_root();
        root.canonicalize().map_err(|e| VignetteError::Root {
            path: root,
            message: e.to_string(),
        })
    }

    /// Find every photo under the root, in gallery order.
    pub fn discover(&self) -> Result<Vec<DiscoveredFile>> {
        let root = self.root()?;
        let discovery = FileDiscovery::new(
            self.config.processing.clone(),
            self.config.gallery.thumbs_dir.clone(),
        );
        Ok(discovery.discover(&root))
    }

    /// Discover and process the whole root.
    pub fn build(&self, options: &ProcessOptions) -> Result<BuildSummary> {
        let files = self.discover()?;
        self.build_files(&files, options, |_, _| {})
    }

    /// Process `files`, then write the gallery for the ones that succeeded.
    ///
    /// `on_file` is called after each file with its outcome, before the next
    /// file starts. Per-file errors never abort the batch; only a missing
    /// root, an uncreatable thumbnail directory or an unwritable gallery do.
    pub fn build_files<F>(
        &self,
        files: &[DiscoveredFile],
        options: &ProcessOptions,
        mut on_file: F,
    ) -> Result<BuildSummary>
    where
        F: FnMut(&DiscoveredFile, &PipelineResult<ProcessedThumbnail>),
    {
        let start = Instant::now();
        let root = self.root()?;
        let thumbs = self.config.thumbs_dir(&root);
        std::fs::create_dir_all(&thumbs).map_err(|e| VignetteError::OutputDir {
            path: thumbs.clone(),
            message: e.to_string(),
        })?;

        let processor = ThumbnailProcessor::new(&self.config, &thumbs);
        let mut summary = BuildSummary::default();

        for file in files {
            if file.new_directory {
                if let Some(dir) = file.path.parent() {
                    tracing::debug!("Entering {:?}", dir);
                }
            }
            tracing::info!("Processing {:?}", file.path);

            let result = processor.process_with_options(&file.path, options);
            on_file(file, &result);

            match result {
                Ok(thumbnail) => summary.processed.push(thumbnail),
                Err(e) => {
                    tracing::error!("Failed {:?}: {}", file.path, e);
                    summary.failures.push(FailedFile::new(&file.path, &e));
                }
            }
        }

        let writer = GalleryWriter::new(&root, self.config.gallery.page_size);
        writer.write(&writer.entries(&summary.processed))?;

        summary.elapsed = start.elapsed();
        tracing::info!(
            "Built {} thumbnails ({} failed) in {:?}",
            summary.succeeded(),
            summary.failed(),
            summary.elapsed
        );
        Ok(summary)
    }
}
