//! High-level image operations.
//!
//! These functions combine calculations with backend execution: normalizing a
//! decoded photo for display and turning a bitmap into an inline data URI.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_display_dimensions;
use super::params::{NormalizeParams, Quality};
use base64::{Engine, engine::general_purpose::STANDARD};
use image::DynamicImage;
use image::imageops::FilterType;
use image::metadata::Orientation;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// MIME prefix for JPEG data URIs.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Resize a photo for display, then rotate/mirror it upright.
///
/// The longer edge of the stored pixels becomes `params.max_dimension`
/// (bicubic resampling). Orientation is applied after resizing; a quarter turn
/// swaps the edges but the longer one still measures the target.
pub fn normalize(
    image: DynamicImage,
    orientation: Orientation,
    params: &NormalizeParams,
) -> DynamicImage {
    let (width, height) =
        calculate_display_dimensions((image.width(), image.height()), params.max_dimension);
    let mut resized = image.resize_exact(width, height, FilterType::CatmullRom);
    resized.apply_orientation(orientation);
    resized
}

/// Encode a bitmap as JPEG and wrap it in a `data:image/jpeg;base64,` URI.
pub fn encode_data_uri(
    backend: &impl ImageBackend,
    image: &DynamicImage,
    quality: Quality,
) -> Result<String> {
    let bytes = backend.encode_jpeg(image, quality)?;
    Ok(format!("{JPEG_DATA_URI_PREFIX}{}", STANDARD.encode(bytes)))
}
