//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the display dimensions for a photo so its longer edge equals `target`.
///
/// The scale factor is `max(width, height) / target`; both edges are divided by
/// it and rounded. Photos smaller than the target are scaled *up* by the same
/// formula. Each edge is clamped to at least 1px so extreme panoramas still
/// produce a valid bitmap.
///
/// # Examples
/// ```
/// # use house_report::imaging::calculate_display_dimensions;
/// // 4000x3000 landscape → 900x675
/// assert_eq!(calculate_display_dimensions((4000, 3000), 900), (900, 675));
///
/// // 600x800 portrait is upscaled → 675x900
/// assert_eq!(calculate_display_dimensions((600, 800), 900), (675, 900));
/// ```
pub fn calculate_display_dimensions(source: (u32, u32), target: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let longer_edge = src_w.max(src_h);
    if longer_edge == 0 {
        return (target, target);
    }

    let scale = longer_edge as f64 / target as f64;
    let width = ((src_w as f64 / scale).round() as u32).max(1);
    let height = ((src_h as f64 / scale).round() as u32).max(1);
    (width, height)
}
