//! Bilinear resize from the coarse decode size to the exact thumbnail size.
//!
//! One scale factor, `output_width / target_width`, drives both axes: the
//! decoder keeps the aspect ratio, so the vertical ratio only differs by
//! rounding. Sample coordinates are clamped to the source bounds, which
//! keeps the rounding slack from ever reading past the last row or column.

use crate::error::{PipelineError, PipelineResult};
use crate::types::Image;

/// Horizontal sampling plan for one destination column.
#[derive(Debug, Clone, Copy)]
struct Tap {
    near: usize,
    far: usize,
    frac: f64,
}

/// Resize `image` to exactly `target_width x target_height`.
///
/// Consumes the image. When the coarse decode already landed on the target
/// width and the height is equal or one row over, the buffer is reused in
/// place (trailing row truncated). Otherwise a new buffer is interpolated
/// and the source buffer is dropped.
pub fn resample(mut image: Image) -> PipelineResult<Image> {
    check_dimensions(&image)?;

    let channels = usize::from(image.num_components);
    let target_width = image.target_width as usize;
    let target_height = image.target_height as usize;

    if image.output_width == image.target_width
        && (image.output_height == image.target_height
            || image.output_height == image.target_height + 1)
    {
        image.pixels.truncate(target_width * target_height * channels);
        image.output_height = image.target_height;
        return Ok(image);
    }

    let src_width = image.output_width as usize;
    let max_x = src_width - 1;
    let max_y = image.output_height as usize - 1;
    let factor = image.output_width as f64 / image.target_width as f64;

    let columns: Vec<Tap> = (0..target_width).map(|x| tap(x, factor, max_x)).collect();

    let src = &image.pixels;
    let mut out = Vec::with_capacity(target_width * target_height * channels);
    for y in 0..target_height {
        let row = tap(y, factor, max_y);
        let top = row.near * src_width;
        let bottom = row.far * src_width;

        for col in &columns {
            let p00 = (top + col.near) * channels;
            let p10 = (top + col.far) * channels;
            let p01 = (bottom + col.near) * channels;
            let p11 = (bottom + col.far) * channels;

            let w00 = (1.0 - col.frac) * (1.0 - row.frac);
            let w10 = col.frac * (1.0 - row.frac);
            let w01 = (1.0 - col.frac) * row.frac;
            let w11 = col.frac * row.frac;

            for c in 0..channels {
                let value = f64::from(src[p00 + c]) * w00
                    + f64::from(src[p10 + c]) * w10
                    + f64::from(src[p01 + c]) * w01
                    + f64::from(src[p11 + c]) * w11;
                out.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }
    }

    image.pixels = out;
    image.output_width = image.target_width;
    image.output_height = image.target_height;
    Ok(image)
}

fn tap(dst: usize, factor: f64, max: usize) -> Tap {
    let pos = dst as f64 * factor;
    let floor = pos.floor();
    let near = (floor as usize).min(max);
    Tap {
        near,
        far: (near + 1).min(max),
        frac: pos - floor,
    }
}

fn check_dimensions(image: &Image) -> PipelineResult<()> {
    let invalid = |message: String| PipelineError::InvalidDimensions {
        path: image.source_path.clone(),
        message,
    };

    if image.target_width == 0 || image.target_height == 0 {
        return Err(invalid(format!(
            "zero target size {}x{}",
            image.target_width, image.target_height
        )));
    }
    if image.output_width == 0 || image.output_height == 0 {
        return Err(invalid(format!(
            "zero source size {}x{}",
            image.output_width, image.output_height
        )));
    }
    if !matches!(image.num_components, 1 | 3) {
        return Err(invalid(format!(
            "unsupported channel count {}",
            image.num_components
        )));
    }
    let expected = image.output_width as usize
        * image.output_height as usize
        * usize::from(image.num_components);
    if image.pixels.len() != expected {
        return Err(invalid(format!(
            "buffer holds {} bytes, expected {}",
            image.pixels.len(),
            expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorSpace;
    use std::path::PathBuf;

    fn image(
        (output_width, output_height): (u32, u32),
        (target_width, target_height): (u32, u32),
        color_space: ColorSpace,
        pixels: Vec<u8>,
    ) -> Image {
        Image {
            num_components: color_space.components(),
            width: output_width,
            height: output_height,
            output_width,
            output_height,
            color_space,
            target_width,
            target_height,
            coarse_factor: 1,
            pixels,
            source_path: PathBuf::from("test.jpg"),
        }
    }

    #[test]
    fn test_fast_path_reuses_buffer() {
        let pixels: Vec<u8> = (0..4 * 3 * 3).map(|v| v as u8).collect();
        let original = pixels.clone();
        let img = image((4, 3), (4, 3), ColorSpace::Rgb, pixels);
        let ptr = img.pixels.as_ptr();

        let out = resample(img).unwrap();
        assert_eq!(out.pixels, original);
        assert_eq!(out.pixels.as_ptr(), ptr);
    }

    #[test]
    fn test_fast_path_truncates_extra_row() {
        let pixels: Vec<u8> = (0..5 * 4).map(|v| v as u8).collect();
        let img = image((5, 4), (5, 3), ColorSpace::Grayscale, pixels.clone());
        let ptr = img.pixels.as_ptr();

        let out = resample(img).unwrap();
        assert_eq!(out.pixels, pixels[..15]);
        assert_eq!(out.pixels.as_ptr(), ptr);
        assert_eq!((out.output_width, out.output_height), (5, 3));
    }

    #[test]
    fn test_two_rows_over_samples_top_rows_at_width_factor() {
        // Row r is filled with r * 10.
        let pixels: Vec<u8> = (0..5u8).flat_map(|r| [r * 10; 5]).collect();
        let img = image((5, 5), (5, 3), ColorSpace::Grayscale, pixels);
        let out = resample(img).unwrap();

        assert_eq!((out.output_width, out.output_height), (5, 3));
        assert_eq!(&out.pixels[0..5], &[0; 5]);
        assert_eq!(&out.pixels[5..10], &[10; 5]);
        assert_eq!(&out.pixels[10..15], &[20; 5]);
    }

    #[test]
    fn test_downscale_by_two_samples_even_pixels() {
        #[rustfmt::skip]
        let pixels = vec![
            10, 20, 30, 40,
            50, 60, 70, 80,
            90, 100, 110, 120,
            130, 140, 150, 160,
        ];
        let img = image((4, 4), (2, 2), ColorSpace::Grayscale, pixels);
        let out = resample(img).unwrap();
        assert_eq!(out.pixels, vec![10, 30, 90, 110]);
        assert_eq!((out.output_width, out.output_height), (2, 2));
    }

    #[test]
    fn test_upscale_interpolates_and_clamps_to_source() {
        let img = image((2, 1), (4, 2), ColorSpace::Grayscale, vec![0, 100]);
        let out = resample(img).unwrap();
        assert_eq!(out.pixels, vec![0, 50, 100, 100, 0, 50, 100, 100]);
    }

    #[test]
    fn test_fractional_weights_blend_four_neighbors() {
        // factor 1.5: destination (1, 1) lands on source (1.5, 1.5)
        #[rustfmt::skip]
        let pixels = vec![
            0, 0, 0,
            0, 100, 200,
            0, 200, 200,
        ];
        let img = image((3, 3), (2, 2), ColorSpace::Grayscale, pixels);
        let out = resample(img).unwrap();
        // 0.25 * (100 + 200 + 200 + 200) = 175
        assert_eq!(out.pixels[3], 175);
        assert_eq!(out.pixels[0], 0);
    }

    #[test]
    fn test_rgb_channels_interpolated_independently() {
        #[rustfmt::skip]
        let pixels = vec![
            255, 0, 0,   255, 0, 0,
            0, 0, 255,   0, 0, 255,
        ];
        let img = image((2, 2), (1, 1), ColorSpace::Rgb, pixels);
        let out = resample(img).unwrap();
        assert_eq!(out.pixels, vec![255, 0, 0]);
    }

    #[test]
    fn test_uniform_color_survives_resize() {
        let pixels = [12u8, 34, 56].repeat(500 * 375);
        let img = image((500, 375), (267, 200), ColorSpace::Rgb, pixels);
        let out = resample(img).unwrap();
        assert_eq!(out.pixels.len(), 267 * 200 * 3);
        assert!(out.pixels.chunks(3).all(|p| p == [12, 34, 56]));
    }

    #[test]
    fn test_output_always_exact_target_size() {
        for &(src, dst) in &[
            ((500, 375), (267, 200)),
            ((134, 100), (267, 200)),
            ((301, 226), (150, 113)),
            ((7, 5), (3, 2)),
        ] {
            let len = (src.0 * src.1) as usize;
            let img = image(src, dst, ColorSpace::Grayscale, vec![128; len]);
            let out = resample(img).unwrap();
            assert_eq!(out.pixels.len(), (dst.0 * dst.1) as usize, "{src:?} -> {dst:?}");
        }
    }

    #[test]
    fn test_zero_target_rejected() {
        let img = image((4, 4), (0, 2), ColorSpace::Grayscale, vec![0; 16]);
        let err = resample(img).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_buffer_length_mismatch_rejected() {
        let img = image((4, 4), (2, 2), ColorSpace::Rgb, vec![0; 16]);
        let err = resample(img).unwrap_err();
        assert!(err.to_string().contains("expected 48"));
    }
}
