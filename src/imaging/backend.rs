//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the report needs:
//! decode a photo together with its metadata, and encode a bitmap as JPEG.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording mock in [`tests`].

use super::params::Quality;
use image::DynamicImage;
use image::metadata::Orientation;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Failed to encode JPEG: {0}")]
    Encode(String),
}

/// Result of a single decode pass over one photo.
///
/// Pixels and metadata come from the same read of the file, so nothing the
/// caption or orientation depend on can be lost by later processing.
#[derive(Debug, Clone)]
pub struct DecodedPhoto {
    /// Pixels exactly as stored, before any orientation correction.
    pub image: DynamicImage,
    /// Correction to apply so the photo displays upright.
    pub orientation: Orientation,
    /// Raw XPComment bytes from the original file's EXIF, if present.
    pub comment: Option<Vec<u8>>,
}

/// Trait for image backends.
pub trait ImageBackend {
    /// Decode an image file and read its embedded EXIF metadata.
    fn decode(&self, path: &Path) -> Result<DecodedPhoto, BackendError>;

    /// Encode a bitmap as baseline JPEG bytes.
    fn encode_jpeg(&self, image: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
