//! # House Report
//!
//! Turns a folder of captioned inspection photos into a home owner's report:
//! a pandoc Markdown document with every photo embedded, and the HTML pandoc
//! makes of it. The caption lives inside the photo, in the Windows
//! "Comments" field, so annotating a shot from the file properties dialog is
//! all it takes to put it in the report.
//!
//! # Pipeline
//!
//! ```text
//! photo dir ─► select ─► render ─► convert ─► report.md + report.html
//!              decode    title      pandoc
//!              caption   block      (or builtin)
//!              normalize entries
//! ```
//!
//! Each stage is a plain function over in-memory data; only [`report`]
//! touches the output directory, and only once conversion has succeeded.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`select`] | Lists the photo directory, decodes each file, keeps captioned photos |
//! | [`metadata`] | Decodes the XPComment field into caption text |
//! | [`imaging`] | Decode/encode backend, EXIF IFD0 reader, resize + orientation |
//! | [`render`] | Builds the Markdown document with JPEG data URIs |
//! | [`convert`] | Markdown → HTML via pandoc or the in-process converter |
//! | [`report`] | Runs the pipeline and writes both files |
//! | [`config`] | Optional `report.toml`: stock defaults, merge, validation |
//! | [`types`] | `PhotoEntry` and `ReportData`, shared by select and render |
//! | [`output`] | CLI summary of a finished run |
//!
//! # Design Decisions
//!
//! ## Caption As Inclusion Filter
//!
//! There is no separate selection step. A photo without a comment is simply
//! not part of the report, which lets a photographer shoot freely and only
//! annotate the findings.
//!
//! ## Self-Contained Output
//!
//! Photos are downscaled to a 900px longer edge, turned upright according to
//! their EXIF orientation and embedded as base64 JPEG data URIs. The report is
//! one file that can be mailed or archived without a photo folder next to it.
//!
//! ## JPEG-Only Imaging
//!
//! The `image` crate is built with just its JPEG codec. Anything else in the
//! photo folder fails to decode and stops the run rather than producing a
//! report with gaps.
//!
//! ## Pandoc For HTML
//!
//! Pandoc owns the Markdown dialect the report is written in, so it is the
//! default converter. The builtin converter understands the subset the
//! renderer produces and is there for machines without pandoc; it is picked
//! in config, never silently.

pub mod config;
pub mod convert;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod render;
pub mod report;
pub mod select;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
