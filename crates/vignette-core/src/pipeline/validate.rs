//! Input validation before decoding.

use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// JPEG start-of-image marker followed by the first marker prefix.
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Validates files before processing.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - File exists and is readable
    /// - File size is within limits
    /// - File starts with a JPEG SOI marker
    pub fn validate(&self, path: &Path) -> Result<(), PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::io(path, e))?;

        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        self.check_magic_bytes(path)
    }

    /// Check the leading bytes for a JPEG signature.
    fn check_magic_bytes(&self, path: &Path) -> Result<(), PipelineError> {
        let file = std::fs::File::open(path).map_err(|e| PipelineError::io(path, e))?;

        let mut header = Vec::with_capacity(JPEG_SOI.len());
        file.take(JPEG_SOI.len() as u64)
            .read_to_end(&mut header)
            .map_err(|e| PipelineError::io(path, e))?;

        if !Self::is_jpeg_header(&header) {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "not a JPEG stream (missing SOI marker)".to_string(),
            });
        }

        Ok(())
    }

    fn is_jpeg_header(header: &[u8]) -> bool {
        header.starts_with(&JPEG_SOI)
    }
}
