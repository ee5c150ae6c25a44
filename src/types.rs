//! Shared types passed between the selector, the renderer and the report flow.

use chrono::NaiveDate;
use image::DynamicImage;
use std::path::PathBuf;

/// One photo that made it into the report.
///
/// Only the [selector](crate::select) constructs these, and only for photos
/// with a non-empty caption.
#[derive(Debug, Clone)]
pub struct PhotoEntry {
    /// File the photo was decoded from.
    pub source_path: PathBuf,
    /// Normalized bitmap: upright, longer edge at the display size.
    pub image: DynamicImage,
    /// Decoded comment text; never empty.
    pub caption: String,
}

/// Everything the renderer needs for one report.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub effective_date: NaiveDate,
    pub property_address: String,
    pub author: String,
    /// In enumeration order; report numbering follows this order.
    pub photos: Vec<PhotoEntry>,
}
