//! Image processing: decode, normalize, encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode + orientation** | `image::ImageReader` / `ImageDecoder::orientation` |
//! | **XPComment** | `ImageDecoder::exif_metadata` + `exif` (kamadak-exif) |
//! | **Normalize** | `resize_exact` (CatmullRom) + `apply_orientation` |
//! | **Embed** | `JpegEncoder` + `base64` data URI |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodedPhoto, ImageBackend};
pub use calculations::calculate_display_dimensions;
pub use operations::{JPEG_DATA_URI_PREFIX, encode_data_uri, normalize};
pub use params::{NormalizeParams, Quality};
pub use rust_backend::RustBackend;
