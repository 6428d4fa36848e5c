//! Shared fixtures for unit tests: synthetic JPEGs written on the fly.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::types::ColorSpace;

/// Diagonal gradient with a different slope per channel.
pub fn gradient_pixels(width: u32, height: u32, components: u8) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height) as usize * components as usize);
    for y in 0..height {
        for x in 0..width {
            for c in 0..u32::from(components) {
                pixels.push(((x * (c + 1) + y * 2) % 256) as u8);
            }
        }
    }
    pixels
}

/// Write a baseline JPEG of the given size and color space to `path`.
pub fn write_jpeg(path: &Path, width: u32, height: u32, color_space: ColorSpace) {
    let pixels = gradient_pixels(width, height, color_space.components());
    let color_type = match color_space {
        ColorSpace::Grayscale => ExtendedColorType::L8,
        ColorSpace::Rgb => ExtendedColorType::Rgb8,
    };
    let file = File::create(path).unwrap();
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), 90);
    encoder.encode(&pixels, width, height, color_type).unwrap();
}
