//! Core data types for the Vignette thumbnail pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::PipelineError;

/// Color space reported by the decoder and handed unchanged to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Single luminance channel
    Grayscale,
    /// Interleaved 8-bit red, green, blue
    Rgb,
}

impl ColorSpace {
    /// Samples per pixel for this color space.
    pub fn components(self) -> u8 {
        match self {
            ColorSpace::Grayscale => 1,
            ColorSpace::Rgb => 3,
        }
    }
}

/// One photo in flight through decode → resample → encode.
///
/// The pixel buffer is owned by the image and moves with it: the resampler
/// consumes the image and returns a new one, the encoder consumes it for
/// good. `pixels` always matches `output_width * output_height *
/// num_components` after decode and `target_width * target_height *
/// num_components` after resample.
#[derive(Debug)]
pub struct Image {
    /// Channel count (1 or 3)
    pub num_components: u8,
    /// Full-resolution width from the JPEG header
    pub width: u32,
    /// Full-resolution height from the JPEG header
    pub height: u32,
    /// Width of the pixel buffer as produced by the coarse decode
    pub output_width: u32,
    /// Height of the pixel buffer as produced by the coarse decode
    pub output_height: u32,
    /// Decoder-reported color space
    pub color_space: ColorSpace,
    /// Final thumbnail width
    pub target_width: u32,
    /// Final thumbnail height
    pub target_height: u32,
    /// Power-of-two reduction applied by the codec (1, 2, 4 or 8)
    pub coarse_factor: u32,
    /// Interleaved samples, row-major
    pub pixels: Vec<u8>,
    /// Where the image was read from
    pub source_path: PathBuf,
}

impl Image {
    /// Whether the buffer already sits at the exact thumbnail size.
    pub fn is_at_target(&self) -> bool {
        self.output_width == self.target_width && self.output_height == self.target_height
    }
}

/// Result of running one file through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedThumbnail {
    /// Absolute path to the source photo
    pub source_path: PathBuf,

    /// Content-addressed thumbnail path
    pub thumbnail_path: PathBuf,

    /// Original width in pixels
    pub width: u32,

    /// Original height in pixels
    pub height: u32,

    /// Thumbnail width in pixels
    pub thumbnail_width: u32,

    /// Thumbnail height in pixels
    pub thumbnail_height: u32,

    /// Coarse downscale factor the decoder used
    pub coarse_factor: u32,

    /// True when an existing thumbnail was reused instead of re-encoded
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

/// A file that failed somewhere in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    /// Path of the offending input
    pub path: PathBuf,

    /// Stage label ("io", "decode", "resample", "encode")
    pub stage: String,

    /// Human-readable error
    pub message: String,
}

impl FailedFile {
    /// Record a pipeline error against the file it happened on.
    pub fn new(path: impl Into<PathBuf>, error: &PipelineError) -> Self {
        Self {
            path: path.into(),
            stage: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Outcome of a whole gallery build.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    /// Successful results in discovery order
    pub processed: Vec<ProcessedThumbnail>,

    /// Per-file failures
    pub failures: Vec<FailedFile>,

    /// Wall time for the batch
    pub elapsed: Duration,
}

impl BuildSummary {
    /// Files that produced (or reused) a thumbnail.
    pub fn succeeded(&self) -> usize {
        self.processed.len()
    }

    /// Files reused from a previous run.
    pub fn skipped(&self) -> usize {
        self.processed.iter().filter(|p| p.skipped).count()
    }

    /// Files that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Throughput over the whole batch.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.succeeded() + self.failed()) as f64 / secs
        } else {
            0.0
        }
    }
}
