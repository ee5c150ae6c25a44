//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the [`operations`](super::operations) module and the
//! [`backend`](super::backend), so a mock backend can stand in during tests.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 75). Clamped on construction.
//! - [`NormalizeParams`]: target size for the longer edge of a normalized photo.

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    /// Matches the quality most desktop tools use when saving a JPEG without
    /// being asked; keeps embedded data URIs small.
    fn default() -> Self {
        Self(75)
    }
}

/// Parameters for normalizing a photo for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeParams {
    /// Length of the longer edge after resizing, in pixels.
    pub max_dimension: u32,
}

impl Default for NormalizeParams {
    /// 900px displays at 100% on a standard HD monitor.
    fn default() -> Self {
        Self { max_dimension: 900 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_75() {
        assert_eq!(Quality::default().value(), 75);
    }

    #[test]
    fn normalize_default_is_900() {
        assert_eq!(NormalizeParams::default().max_dimension, 900);
    }
}
