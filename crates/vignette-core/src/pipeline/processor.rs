//! Pipeline orchestration - wires together all processing stages.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::error::PipelineResult;
use crate::types::ProcessedThumbnail;

use super::decode::JpegDecoder;
use super::encode::ThumbnailEncoder;
use super::naming::ThumbnailNamer;
use super::resample::resample;
use super::validate::Validator;

/// Options for controlling per-file processing behavior.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Reuse a thumbnail that already exists at the content-addressed path
    pub skip_existing: bool,
}

/// Runs one photo through validate → decode → resample → encode.
pub struct ThumbnailProcessor {
    validator: Validator,
    decoder: JpegDecoder,
    encoder: ThumbnailEncoder,
    namer: ThumbnailNamer,
}

impl ThumbnailProcessor {
    /// Create a processor writing thumbnails into `output_dir`.
    pub fn new(config: &Config, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            decoder: JpegDecoder::new(config.thumbnail.target_height, config.limits.clone()),
            encoder: ThumbnailEncoder::new(&config.thumbnail),
            namer: ThumbnailNamer::new(output_dir),
        }
    }

    /// Process a single photo with default options.
    pub fn process(&self, path: &Path) -> PipelineResult<ProcessedThumbnail> {
        self.process_with_options(path, &ProcessOptions::default())
    }

    /// Process a single photo with custom options.
    ///
    /// Every error is scoped to `path`; nothing is written on failure.
    pub fn process_with_options(
        &self,
        path: &Path,
        options: &ProcessOptions,
    ) -> PipelineResult<ProcessedThumbnail> {
        let start = Instant::now();
        let destination = self.namer.destination_for(path);

        if options.skip_existing && destination.is_file() {
            tracing::debug!("Reusing existing thumbnail for {:?}", path);
            return Ok(ProcessedThumbnail {
                source_path: path.to_path_buf(),
                thumbnail_path: destination,
                width: 0,
                height: 0,
                thumbnail_width: 0,
                thumbnail_height: 0,
                coarse_factor: 0,
                skipped: true,
            });
        }

        self.validator.validate(path)?;
        tracing::trace!("  Validate: {:?}", start.elapsed());

        let decode_start = Instant::now();
        let decoded = self.decoder.decode(path)?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        let (width, height) = (decoded.width, decoded.height);
        let coarse_factor = decoded.coarse_factor;

        let resample_start = Instant::now();
        let thumbnail = resample(decoded)?;
        tracing::trace!("  Resample: {:?}", resample_start.elapsed());

        let (thumbnail_width, thumbnail_height) =
            (thumbnail.target_width, thumbnail.target_height);

        let encode_start = Instant::now();
        self.encoder.encode(thumbnail, &destination)?;
        tracing::trace!("  Encode: {:?}", encode_start.elapsed());

        tracing::debug!(
            "Processed {:?} in {:?} ({}x{} -> {}x{})",
            path,
            start.elapsed(),
            width,
            height,
            thumbnail_width,
            thumbnail_height
        );

        Ok(ProcessedThumbnail {
            source_path: path.to_path_buf(),
            thumbnail_path: destination,
            width,
            height,
            thumbnail_width,
            thumbnail_height,
            coarse_factor,
            skipped: false,
        })
    }

    /// The namer used for destination paths.
    pub fn namer(&self) -> &ThumbnailNamer {
        &self.namer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::test_util::write_jpeg;
    use crate::types::ColorSpace;

    #[test]
    fn test_process_options_default() {
        let options = ProcessOptions::default();
        assert!(!options.skip_existing);
    }

    #[test]
    fn test_process_writes_content_addressed_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        write_jpeg(&source, 640, 480, ColorSpace::Rgb);
        let thumbs = dir.path().join("thumbs");
        std::fs::create_dir(&thumbs).unwrap();

        let mut config = Config::default();
        config.thumbnail.target_height = 90;
        let processor = ThumbnailProcessor::new(&config, &thumbs);

        let result = processor.process(&source).unwrap();
        assert_eq!(result.thumbnail_path, processor.namer().destination_for(&source));
        assert_eq!((result.width, result.height), (640, 480));
        assert_eq!((result.thumbnail_width, result.thumbnail_height), (120, 90));
        assert_eq!(result.coarse_factor, 4);
        assert!(!result.skipped);
        assert_eq!(
            image::image_dimensions(&result.thumbnail_path).unwrap(),
            (120, 90)
        );
    }

    #[test]
    fn test_reprocessing_overwrites_same_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        write_jpeg(&source, 300, 200, ColorSpace::Rgb);
        let thumbs = dir.path().join("thumbs");
        std::fs::create_dir(&thumbs).unwrap();

        let processor = ThumbnailProcessor::new(&Config::default(), &thumbs);
        let first = processor.process(&source).unwrap();
        let second = processor.process(&source).unwrap();

        assert_eq!(first.thumbnail_path, second.thumbnail_path);
        assert_eq!(std::fs::read_dir(&thumbs).unwrap().count(), 1);
    }

    #[test]
    fn test_skip_existing_reuses_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        write_jpeg(&source, 300, 200, ColorSpace::Rgb);
        let thumbs = dir.path().join("thumbs");
        std::fs::create_dir(&thumbs).unwrap();

        let processor = ThumbnailProcessor::new(&Config::default(), &thumbs);
        processor.process(&source).unwrap();

        let options = ProcessOptions {
            skip_existing: true,
        };
        let again = processor.process_with_options(&source, &options).unwrap();
        assert!(again.skipped);
        assert_eq!(again.thumbnail_path, processor.namer().destination_for(&source));
    }

    #[test]
    fn test_corrupt_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.jpg");
        std::fs::write(&source, [0xFF, 0xD8, 0xFF, 0xDB, 0x00, 0x02, 0x13, 0x37]).unwrap();
        let thumbs = dir.path().join("thumbs");
        std::fs::create_dir(&thumbs).unwrap();

        let processor = ThumbnailProcessor::new(&Config::default(), &thumbs);
        let err = processor.process(&source).unwrap_err();

        assert!(matches!(err, PipelineError::Decode { .. }), "{err}");
        assert_eq!(std::fs::read_dir(&thumbs).unwrap().count(), 0);
    }
}
