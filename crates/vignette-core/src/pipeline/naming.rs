//! Content-addressed thumbnail naming.
//!
//! Thumbnail filenames are the BLAKE3 digest of the source path, so a
//! re-run maps every photo onto the thumbnail it produced last time and
//! overwrites it instead of piling up copies.

use blake3::Hasher as Blake3Hasher;
use std::path::{Path, PathBuf};

/// Extension used for every thumbnail.
pub const THUMBNAIL_EXTENSION: &str = "jpg";

/// Maps source paths to thumbnail paths inside one output directory.
#[derive(Debug, Clone)]
pub struct ThumbnailNamer {
    output_dir: PathBuf,
}

impl ThumbnailNamer {
    /// Create a namer writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Lowercase hex BLAKE3 digest of the path's bytes.
    pub fn digest(source: &Path) -> String {
        let mut hasher = Blake3Hasher::new();
        hasher.update(source.as_os_str().as_encoded_bytes());
        hasher.finalize().to_hex().to_string()
    }

    /// `{output_dir}/{digest(source)}.jpg`.
    pub fn destination_for(&self, source: &Path) -> PathBuf {
        self.output_dir.join(format!("{}.{}", Self::digest(source), THUMBNAIL_EXTENSION))
    }
}
