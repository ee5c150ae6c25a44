//! Caption extraction from embedded photo metadata.
//!
//! A photo's caption is the Windows "Comments" field, stored in EXIF as
//! XPComment (`0x9C9E`, decimal 40092). It is what Explorer's file
//! properties dialog writes, which makes it the quickest way to annotate a
//! folder of inspection photos without any photo-management software.
//!
//! ## Decoding
//!
//! The field is a BYTE array. Windows stores UCS-2 little-endian text with a
//! NUL terminator; other tools write plain UTF-8. An even-length payload is
//! read as UTF-16LE when any of these hold:
//!
//! - it ends in a NUL code unit
//! - every high byte is NUL
//! - it is not valid UTF-8
//!
//! Anything else is read as UTF-8. Every NUL is stripped from the result.
//!
//! An absent or empty field yields an empty caption, which is how a photo
//! opts out of the report.

/// Extract the caption from a photo's raw XPComment bytes.
///
/// Returns an empty string when the comment field is absent.
pub fn extract_caption(comment: Option<&[u8]>) -> String {
    comment.map(decode_comment).unwrap_or_default()
}

/// Decode a raw XPComment payload into text, stripping NUL characters.
pub fn decode_comment(bytes: &[u8]) -> String {
    let text = if looks_like_utf16le(bytes) {
        decode_utf16le(bytes)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };
    text.replace('\0', "")
}

fn looks_like_utf16le(bytes: &[u8]) -> bool {
    if bytes.is_empty() || bytes.len() % 2 != 0 {
        return false;
    }
    bytes.ends_with(&[0, 0])
        || bytes.iter().skip(1).step_by(2).all(|&b| b == 0)
        || std::str::from_utf8(bytes).is_err()
}

/// Decode UTF-16LE, replacing unpaired surrogates.
fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
