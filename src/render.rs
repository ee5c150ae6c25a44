//! Markup rendering.
//!
//! Turns [`ReportData`] into a pandoc-flavoured Markdown document. The output
//! is plain text; nothing here touches the filesystem.
//!
//! ## Document Layout
//!
//! ```text
//! % Home Owner's Report for 123 Main St       ← pandoc title block
//! % J. Smith
//! % March 4, 2024
//!
//! #### 1. Cracked tile                        ← one heading per photo, 1-indexed
//! ![](data:image/jpeg;base64,/9j/4AAQ...){width=90%}
//!
//! #### 2. Loose railing
//! ![](data:image/jpeg;base64,/9j/4AAQ...){width=90%}
//!
//! ```
//!
//! Photos are embedded as JPEG data URIs so the report is a single
//! self-contained file that survives being emailed around.

use crate::config::ReportConfig;
use crate::imaging::{BackendError, ImageBackend, Quality, encode_data_uri};
use crate::types::ReportData;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// `strftime` pattern for the report date: "March 4, 2024".
pub const DATE_FORMAT: &str = "%B %-d, %Y";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to embed {}: {source}", path.display())]
    Embed {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Rendering settings derived from [`ReportConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub title_prefix: String,
    pub image_width: String,
    pub quality: Quality,
}

impl RenderOptions {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            title_prefix: config.render.title_prefix.clone(),
            image_width: config.render.image_width.clone(),
            quality: Quality::new(config.render.jpeg_quality),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

/// Format the effective date the way it appears in the title block.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Render the whole report as Markdown text ending in a newline.
pub fn render_report(
    data: &ReportData,
    options: &RenderOptions,
    backend: &impl ImageBackend,
) -> Result<String, RenderError> {
    let mut lines = vec![
        title_line(&format!("{} {}", options.title_prefix, data.property_address)),
        title_line(&data.author),
        title_line(&format_date(data.effective_date)),
        String::new(),
    ];

    for (i, photo) in data.photos.iter().enumerate() {
        let uri = encode_data_uri(backend, &photo.image, options.quality).map_err(|source| {
            RenderError::Embed {
                path: photo.source_path.clone(),
                source,
            }
        })?;

        lines.push(entry_heading(i + 1, &photo.caption));
        lines.push(format!("![]({uri}){{width={}}}", options.image_width));
        lines.push(String::new());
    }

    let mut markup = lines.join("\n");
    markup.push('\n');
    Ok(markup)
}

/// A pandoc title-block line.
fn title_line(text: &str) -> String {
    format!("% {}", single_line(text)).trim_end().to_string()
}

/// `#### <n>. <caption>`; the numbering is part of the heading text so it
/// survives into the table of contents.
fn entry_heading(number: usize, caption: &str) -> String {
    format!("#### {}. {}", number, single_line(caption))
}

/// Fold line breaks into spaces so the text stays on one markup line.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
