//! Error types for the Vignette thumbnail pipeline.
//!
//! Errors are split by scope: [`PipelineError`] is always tied to a single
//! input file and never aborts a batch, while [`VignetteError`] covers the
//! few conditions that make the whole run impossible (bad configuration, an
//! output directory that cannot be created).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Vignette operations.
#[derive(Error, Debug)]
pub enum VignetteError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// The gallery root is missing or unreadable
    #[error("Cannot open gallery root {path}: {message}")]
    Root { path: PathBuf, message: String },

    /// The thumbnail directory could not be created
    #[error("Cannot create thumbnail directory {path}: {message}")]
    OutputDir { path: PathBuf, message: String },

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors (run report)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-file pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Opening, reading or writing a file failed
    #[error("IO error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The JPEG stream is malformed or uses an unsupported encoding
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The codec rejected the thumbnail while compressing it
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Pixel buffer and declared dimensions disagree, or a dimension is zero
    #[error("Invalid dimensions for {path}: {message}")]
    InvalidDimensions { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

impl PipelineError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Short stage label used in logs and the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } | Self::FileNotFound(_) => "io",
            Self::Decode { .. } | Self::FileTooLarge { .. } | Self::ImageTooLarge { .. } => {
                "decode"
            }
            Self::Encode { .. } => "encode",
            Self::InvalidDimensions { .. } => "resample",
        }
    }
}

/// Convenience type alias for Vignette results.
pub type Result<T> = std::result::Result<T, VignetteError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_helper_keeps_path() {
        let err = PipelineError::io(
            "/photos/a.jpg",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/photos/a.jpg"));
        assert!(msg.contains("denied"));
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_kind_labels() {
        let decode = PipelineError::Decode {
            path: PathBuf::from("x.jpg"),
            message: "bad marker".into(),
        };
        let encode = PipelineError::Encode {
            path: PathBuf::from("x.jpg"),
            message: "boom".into(),
        };
        assert_eq!(decode.kind(), "decode");
        assert_eq!(encode.kind(), "encode");
        assert_eq!(PipelineError::FileNotFound(PathBuf::from("x")).kind(), "io");
    }
}
