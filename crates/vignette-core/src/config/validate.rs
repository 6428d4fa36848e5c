//! Configuration validation with range checks.

use std::path::{Component, Path};

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "gallery.page_size must be > 0".into(),
            ));
        }
        if self.gallery.thumbs_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gallery.thumbs_dir must not be empty".into(),
            ));
        }
        if !is_single_dir_name(&self.gallery.thumbs_dir) {
            return Err(ConfigError::ValidationError(format!(
                "gallery.thumbs_dir must be a single directory name, got {:?}",
                self.gallery.thumbs_dir
            )));
        }
        if self.thumbnail.target_height == 0 {
            return Err(ConfigError::ValidationError(
                "thumbnail.target_height must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnail.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "thumbnail.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Discovery skips the thumbnail directory by its file name, so it has to be
/// one plain path component directly under the root.
fn is_single_dir_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
