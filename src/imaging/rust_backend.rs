//! Pure Rust image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG) | `image::ImageReader` with content sniffing, `ImageDecoder` |
//! | Orientation | `ImageDecoder::orientation` |
//! | XPComment | `ImageDecoder::exif_metadata` + `exif::Reader::read_raw` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! Files are opened without looking at their extension: the format is sniffed
//! from the leading bytes, so a photo saved as `IMG_0001` or `IMG_0001.JPG`
//! decodes the same way, and a stray text file fails with a decode error.

use super::backend::{BackendError, DecodedPhoto, ImageBackend};
use super::params::Quality;
use exif::{Context, In, Tag, Value};
use image::codecs::jpeg::JpegEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::path::Path;

/// Windows "Comments" field (decimal 40092) in IFD0.
pub const XP_COMMENT: Tag = Tag(Context::Tiff, 0x9C9E);

/// APP1 signature some decoders leave in front of the TIFF header.
const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// Backend built on the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::Decode {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DecodedPhoto, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let mut decoder = reader.into_decoder().map_err(|e| decode_error(path, e))?;

        // Unreadable EXIF means no caption and no rotation, not a broken photo
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
        let comment = decoder
            .exif_metadata()
            .ok()
            .flatten()
            .and_then(|chunk| read_xp_comment(&chunk));

        let image = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
        log::debug!(
            "decoded {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            orientation
        );

        Ok(DecodedPhoto {
            image,
            orientation,
            comment,
        })
    }

    fn encode_jpeg(&self, image: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
        // JPEG has no alpha channel
        let rgb = image.to_rgb8();
        let mut bytes = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value());
            encoder
                .encode_image(&rgb)
                .map_err(|e| BackendError::Encode(e.to_string()))?;
        }
        Ok(bytes)
    }
}

/// Raw XPComment bytes from an EXIF chunk, if the field is present.
pub fn read_xp_comment(chunk: &[u8]) -> Option<Vec<u8>> {
    let tiff = chunk.strip_prefix(EXIF_SIGNATURE).unwrap_or(chunk);
    let exif = match exif::Reader::new().read_raw(tiff.to_vec()) {
        Ok(exif) => exif,
        Err(e) => {
            log::debug!("ignoring unreadable EXIF: {e}");
            return None;
        }
    };
    match &exif.get_field(XP_COMMENT, In::PRIMARY)?.value {
        Value::Byte(bytes) | Value::Undefined(bytes, _) => Some(bytes.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ExifSpec, exif_tiff, jpeg_with_exif, write_jpeg};

    fn utf16le(text: &str) -> Vec<u8> {
        let mut bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        bytes.extend_from_slice(&[0, 0]);
        bytes
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_jpeg(tmp.path(), "test.jpg", 200, 150, &ExifSpec::default());

        let decoded = RustBackend::new().decode(&path).unwrap();
        assert_eq!(decoded.image.width(), 200);
        assert_eq!(decoded.image.height(), 150);
        assert_eq!(decoded.orientation, Orientation::NoTransforms);
        assert_eq!(decoded.comment, None);
    }

    #[test]
    fn decode_reads_comment_and_orientation() {
        let tmp = tempfile::TempDir::new().unwrap();
        let spec = ExifSpec {
            comment: Some("Cracked tile"),
            orientation: Some(6),
        };
        let path = write_jpeg(tmp.path(), "test.jpg", 64, 48, &spec);

        let decoded = RustBackend::new().decode(&path).unwrap();
        assert_eq!(decoded.orientation, Orientation::Rotate90);
        assert_eq!(decoded.comment, Some(utf16le("Cracked tile")));
        // Pixels are returned as stored; rotation happens during normalization
        assert_eq!(decoded.image.width(), 64);
        assert_eq!(decoded.image.height(), 48);
    }

    #[test]
    fn decode_reads_orientation_without_comment() {
        let tmp = tempfile::TempDir::new().unwrap();
        let spec = ExifSpec {
            comment: None,
            orientation: Some(8),
        };
        let path = write_jpeg(tmp.path(), "test.jpg", 40, 30, &spec);

        let decoded = RustBackend::new().decode(&path).unwrap();
        assert_eq!(decoded.orientation, Orientation::Rotate270);
        assert_eq!(decoded.comment, None);
    }

    #[test]
    fn decode_ignores_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("IMG_0001");
        std::fs::write(&path, jpeg_with_exif(32, 32, &ExifSpec::default())).unwrap();

        let decoded = RustBackend::new().decode(&path).unwrap();
        assert_eq!(decoded.image.width(), 32);
    }

    #[test]
    fn decode_nonexistent_file_errors() {
        let result = RustBackend::new().decode(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn decode_non_image_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "not a photo").unwrap();

        let result = RustBackend::new().decode(&path);
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    // =========================================================================
    // read_xp_comment() tests
    // =========================================================================

    #[test]
    fn xp_comment_from_bare_tiff() {
        let tiff = exif_tiff(&ExifSpec::comment("Mold"));
        assert_eq!(read_xp_comment(&tiff), Some(utf16le("Mold")));
    }

    #[test]
    fn xp_comment_after_exif_signature() {
        let mut chunk = b"Exif\0\0".to_vec();
        chunk.extend(exif_tiff(&ExifSpec::comment("Loose railing")));
        assert_eq!(read_xp_comment(&chunk), Some(utf16le("Loose railing")));
    }

    #[test]
    fn xp_comment_stored_inline() {
        // Two bytes of UTF-16LE plus the terminator fit in the entry itself
        let tiff = exif_tiff(&ExifSpec::comment("A"));
        assert_eq!(read_xp_comment(&tiff), Some(vec![b'A', 0, 0, 0]));
    }

    #[test]
    fn xp_comment_absent() {
        let spec = ExifSpec {
            comment: None,
            orientation: Some(3),
        };
        assert_eq!(read_xp_comment(&exif_tiff(&spec)), None);
    }

    #[test]
    fn xp_comment_from_garbage_is_none() {
        assert_eq!(read_xp_comment(b"not a tiff header"), None);
        assert_eq!(read_xp_comment(&[]), None);
    }

    #[test]
    fn encode_jpeg_roundtrips_dimensions() {
        let backend = RustBackend::new();
        let img = DynamicImage::new_rgb8(120, 80);
        let bytes = backend.encode_jpeg(&img, Quality::default()).unwrap();

        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (120, 80));
    }

    #[test]
    fn encode_jpeg_drops_alpha() {
        let backend = RustBackend::new();
        let img = DynamicImage::new_rgba8(16, 16);
        assert!(backend.encode_jpeg(&img, Quality::new(90)).is_ok());
    }
}
