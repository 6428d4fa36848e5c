//! Thumbnail pipeline stages.
//!
//! - **discovery**: Find photos under the gallery root
//! - **validate**: Cheap checks before any decoding
//! - **decode**: Coarse JPEG decode at a reduced scale
//! - **resample**: Bilinear reduction to the exact thumbnail size
//! - **encode**: Baseline JPEG output, written atomically
//! - **naming**: Content-addressed thumbnail paths
//! - **processor**: Runs one file through all of the above

pub mod decode;
pub mod discovery;
pub mod encode;
pub mod naming;
pub mod processor;
pub mod resample;
pub mod validate;

pub use decode::JpegDecoder;
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::ThumbnailEncoder;
pub use naming::ThumbnailNamer;
pub use processor::{ProcessOptions, ThumbnailProcessor};
pub use resample::resample;
pub use validate::Validator;
