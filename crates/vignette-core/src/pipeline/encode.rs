//! Thumbnail encoding to baseline JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageError};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::ThumbnailConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{ColorSpace, Image};

/// Writes resampled images to disk as JPEG.
pub struct ThumbnailEncoder {
    quality: u8,
}

impl ThumbnailEncoder {
    /// Create a new encoder with the configured quality.
    pub fn new(config: &ThumbnailConfig) -> Self {
        Self {
            quality: config.jpeg_quality,
        }
    }

    /// Encode `image` to `destination`, replacing any existing file.
    ///
    /// The JPEG is written to a temporary file next to the destination and
    /// renamed into place once flushed, so readers never see a partial
    /// thumbnail. Consumes the image; its buffer is released before the
    /// rename.
    pub fn encode(&self, image: Image, destination: &Path) -> PipelineResult<()> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".vignette-")
            .suffix(".jpg.part")
            .tempfile_in(dir)
            .map_err(|e| PipelineError::io(destination, e))?;

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.write_jpeg(&image, &mut writer, destination)?;
            writer.flush().map_err(|e| PipelineError::io(destination, e))?;
        }
        drop(image);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(|e| PipelineError::io(destination, e))?;
        }

        tmp.persist(destination)
            .map_err(|e| PipelineError::io(destination, e.error))?;
        Ok(())
    }

    /// Encode `image` into an in-memory JPEG.
    pub fn encode_to_vec(&self, image: &Image) -> PipelineResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_jpeg(image, &mut buffer, &image.source_path)?;
        Ok(buffer)
    }

    fn write_jpeg<W: Write>(
        &self,
        image: &Image,
        writer: W,
        destination: &Path,
    ) -> PipelineResult<()> {
        let expected = image.target_width as usize
            * image.target_height as usize
            * usize::from(image.num_components);
        if !image.is_at_target() || image.pixels.len() != expected {
            return Err(PipelineError::Encode {
                path: destination.to_path_buf(),
                message: format!(
                    "buffer is {}x{} ({} bytes), expected {}x{} ({} bytes)",
                    image.output_width,
                    image.output_height,
                    image.pixels.len(),
                    image.target_width,
                    image.target_height,
                    expected
                ),
            });
        }

        let color_type = match image.color_space {
            ColorSpace::Grayscale => ExtendedColorType::L8,
            ColorSpace::Rgb => ExtendedColorType::Rgb8,
        };

        let mut encoder = JpegEncoder::new_with_quality(writer, self.quality);
        encoder
            .encode(&image.pixels, image.target_width, image.target_height, color_type)
            .map_err(|e| match e {
                ImageError::IoError(err) => PipelineError::io(destination, err),
                other => PipelineError::Encode {
                    path: destination.to_path_buf(),
                    message: other.to_string(),
                },
            })
    }
}
