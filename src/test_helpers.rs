//! Shared test utilities for the house-report test suite.
//!
//! Builds real JPEG files with an EXIF segment carrying the fields the report
//! reads, so selection and rendering can be exercised against actual decodes.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_jpeg(tmp.path(), "01.jpg", 400, 300, &ExifSpec::comment("Cracked tile"));
//! write_jpeg(tmp.path(), "02.jpg", 400, 300, &ExifSpec::default());
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};

/// EXIF fields to embed in a synthetic JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifSpec<'a> {
    /// Stored as XPComment: UTF-16LE with a NUL terminator, as Windows writes it.
    pub comment: Option<&'a str>,
    pub orientation: Option<u16>,
}

impl<'a> ExifSpec<'a> {
    pub fn comment(text: &'a str) -> Self {
        Self {
            comment: Some(text),
            orientation: None,
        }
    }
}

// =========================================================================
// EXIF construction
// =========================================================================

/// Build a little-endian TIFF structure with an IFD0 holding the given fields.
pub fn exif_tiff(spec: &ExifSpec) -> Vec<u8> {
    let comment = spec.comment.map(|text| {
        let mut bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        bytes.extend_from_slice(&[0, 0]);
        bytes
    });

    let entry_count = spec.orientation.is_some() as usize + comment.is_some() as usize;
    let data_offset = 8 + 2 + entry_count * 12 + 4;

    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    out.extend_from_slice(&(entry_count as u16).to_le_bytes());

    // Entries must be sorted by tag: Orientation (0x0112) before XPComment (0x9C9E)
    if let Some(orientation) = spec.orientation {
        out.extend_from_slice(&0x0112u16.to_le_bytes());
        out.extend_from_slice(&3u16.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&orientation.to_le_bytes());
        out.extend_from_slice(&[0, 0]);
    }
    if let Some(bytes) = &comment {
        out.extend_from_slice(&0x9C9Eu16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        if bytes.len() <= 4 {
            let mut inline = bytes.clone();
            inline.resize(4, 0);
            out.extend_from_slice(&inline);
        } else {
            out.extend_from_slice(&(data_offset as u32).to_le_bytes());
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    if let Some(bytes) = &comment {
        if bytes.len() > 4 {
            out.extend_from_slice(bytes);
        }
    }
    out
}

// =========================================================================
// JPEG construction
// =========================================================================

/// Encode a gradient JPEG and splice an APP1/EXIF segment in after SOI.
pub fn jpeg_with_exif(width: u32, height: u32, spec: &ExifSpec) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut encoded = Vec::new();
    JpegEncoder::new(&mut encoded)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();

    if spec.comment.is_none() && spec.orientation.is_none() {
        return encoded;
    }

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend(exif_tiff(spec));

    let mut out = Vec::with_capacity(encoded.len() + payload.len() + 4);
    out.extend_from_slice(&encoded[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&encoded[2..]);
    out
}

/// Write a synthetic JPEG into `dir` and return its path.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32, spec: &ExifSpec) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, jpeg_with_exif(width, height, spec)).unwrap();
    path
}

/// Write the minimal stylesheet the converters include into the document head.
pub fn write_stylesheet(dir: &Path) -> PathBuf {
    let path = dir.join("style.css");
    std::fs::write(&path, "<style>body { max-width: 60em; }</style>\n").unwrap();
    path
}
