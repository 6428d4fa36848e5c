//! JPEG decoding with codec-native coarse downscaling.
//!
//! The decoder reads the frame header first, works out the exact thumbnail
//! size from the configured height and the source aspect ratio, then asks
//! the codec to decode at the largest power-of-two reduction (1/2, 1/4,
//! 1/8) that still leaves at least the thumbnail resolution. The precise
//! resize is left to [`super::resample`].

use jpeg_decoder::PixelFormat;
use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{ColorSpace, Image};

/// Reduction factors the codec can apply during decode, largest first.
const COARSE_FACTORS: [u32; 3] = [8, 4, 2];

/// Largest width or height a baseline JPEG frame can declare.
const JPEG_MAX_DIMENSION: u32 = 65535;

/// Decodes JPEG files into owned pixel buffers at reduced resolution.
pub struct JpegDecoder {
    target_height: u32,
    limits: LimitsConfig,
}

impl JpegDecoder {
    /// Create a decoder producing buffers suitable for `target_height` thumbnails.
    pub fn new(target_height: u32, limits: LimitsConfig) -> Self {
        Self {
            target_height,
            limits,
        }
    }

    /// Decode `path` into an [`Image`] whose buffer is at least the target size.
    pub fn decode(&self, path: &Path) -> PipelineResult<Image> {
        let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
        let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));

        decoder.read_info().map_err(|e| decode_error(path, e))?;
        let info = decoder
            .info()
            .ok_or_else(|| decode_error(path, "missing frame header"))?;

        let color_space = match info.pixel_format {
            PixelFormat::L8 => ColorSpace::Grayscale,
            PixelFormat::RGB24 => ColorSpace::Rgb,
            other => {
                return Err(decode_error(
                    path,
                    format!("unsupported pixel format {:?}", other),
                ))
            }
        };
        let num_components = color_space.components();

        let width = u32::from(info.width);
        let height = u32::from(info.height);
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }

        let (target_width, target_height) =
            target_dimensions(width, height, self.target_height).ok_or_else(|| {
                decode_error(path, format!("invalid header dimensions {width}x{height}"))
            })?;

        let max_target = self.limits.max_image_dimension.min(JPEG_MAX_DIMENSION);
        if target_width > max_target || target_height > max_target {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width: target_width,
                height: target_height,
                max_dim: max_target,
            });
        }

        let factor = coarse_factor(width, height, target_width, target_height);
        // Both values are bounded by the u16 header dimensions.
        let requested_width = width.div_ceil(factor) as u16;
        let requested_height = height.div_ceil(factor) as u16;
        let (output_width, output_height) = decoder
            .scale(requested_width, requested_height)
            .map_err(|e| decode_error(path, e))?;
        let output_width = u32::from(output_width);
        let output_height = u32::from(output_height);

        tracing::trace!(
            "  Header {}x{} -> target {}x{}, coarse 1/{} -> {}x{}",
            width,
            height,
            target_width,
            target_height,
            factor,
            output_width,
            output_height
        );

        let pixels = decoder.decode().map_err(|e| decode_error(path, e))?;

        let expected =
            output_width as usize * output_height as usize * usize::from(num_components);
        if pixels.len() != expected {
            return Err(decode_error(
                path,
                format!(
                    "decoded {} bytes, expected {} for {}x{}x{}",
                    pixels.len(),
                    expected,
                    output_width,
                    output_height,
                    num_components
                ),
            ));
        }

        Ok(Image {
            num_components,
            width,
            height,
            output_width,
            output_height,
            color_space,
            target_width,
            target_height,
            coarse_factor: factor,
            pixels,
            source_path: path.to_path_buf(),
        })
    }
}

fn decode_error(path: &Path, message: impl Display) -> PipelineError {
    PipelineError::Decode {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Aspect-preserving thumbnail size for a fixed target height.
///
/// `target_width = round(target_height * width / height)`, never below 1.
/// Returns `None` for a zero source dimension or a zero target height.
pub fn target_dimensions(width: u32, height: u32, target_height: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || target_height == 0 {
        return None;
    }
    let numerator = 2 * u64::from(target_height) * u64::from(width) + u64::from(height);
    let target_width = numerator / (2 * u64::from(height));
    let target_width = u32::try_from(target_width).ok()?.max(1);
    Some((target_width, target_height))
}

/// Largest power-of-two reduction the codec may apply without undershooting.
///
/// Picks `d` from 8, 4, 2 such that `width >= d * target_width` and the
/// reduced height `ceil(height / d)` still covers `target_height`; falls
/// back to 1.
pub fn coarse_factor(width: u32, height: u32, target_width: u32, target_height: u32) -> u32 {
    COARSE_FACTORS
        .iter()
        .copied()
        .find(|&d| {
            u64::from(width) >= u64::from(d) * u64::from(target_width)
                && height.div_ceil(d) >= target_height
        })
        .unwrap_or(1)
}
