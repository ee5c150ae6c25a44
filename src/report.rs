//! Report generation: the full pipeline from photo directory to files.
//!
//! ```text
//! select_photos ──► render_report ──► converter.convert ──► <stem>.md
//!                                                         └► <stem>.html
//! ```
//!
//! Both files are written only after conversion succeeds, so any failure
//! along the way leaves the output directory untouched.

use crate::config::ReportConfig;
use crate::convert::{ConvertError, DocumentConverter};
use crate::imaging::ImageBackend;
use crate::render::{RenderError, RenderOptions, render_report};
use crate::select::{SelectError, SelectOptions, select_photos};
use crate::types::{PhotoEntry, ReportData};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What the report is about, as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub author: String,
    pub property_address: String,
    pub photo_dir: PathBuf,
    pub effective_date: NaiveDate,
}

/// One numbered entry as it appears in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySummary {
    /// 1-based position in the report.
    pub number: usize,
    pub source: PathBuf,
    pub caption: String,
    /// Normalized dimensions of the embedded image.
    pub width: u32,
    pub height: u32,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    pub markup_path: PathBuf,
    pub html_path: PathBuf,
    pub entries: Vec<EntrySummary>,
    /// Photos left out for lack of a caption.
    pub skipped: Vec<PathBuf>,
}

/// Build the report for `request` and write `<stem>.md` and `<stem>.html`
/// into `output_dir`, overwriting existing files.
pub fn generate_report(
    request: &ReportRequest,
    config: &ReportConfig,
    backend: &impl ImageBackend,
    converter: &dyn DocumentConverter,
    output_dir: &Path,
) -> Result<ReportOutput, ReportError> {
    let mut selection = select_photos(
        backend,
        &request.photo_dir,
        &SelectOptions::from_config(config),
    )?;
    let photos: Vec<PhotoEntry> = selection.by_ref().collect::<Result<_, _>>()?;
    let skipped = selection.skipped().to_vec();
    log::info!(
        "{} captioned photos, {} skipped",
        photos.len(),
        skipped.len()
    );

    let entries = photos
        .iter()
        .enumerate()
        .map(|(i, photo)| EntrySummary {
            number: i + 1,
            source: photo.source_path.clone(),
            caption: photo.caption.clone(),
            width: photo.image.width(),
            height: photo.image.height(),
        })
        .collect();

    let data = ReportData {
        effective_date: request.effective_date,
        property_address: request.property_address.clone(),
        author: request.author.clone(),
        photos,
    };
    let markup = render_report(&data, &RenderOptions::from_config(config), backend)?;
    let html = converter.convert(&markup)?;

    let stem = &config.output.stem;
    let markup_path = output_dir.join(format!("{stem}.md"));
    let html_path = output_dir.join(format!("{stem}.html"));
    write_file(&markup_path, &markup)?;
    write_file(&html_path, &html)?;

    Ok(ReportOutput {
        markup_path,
        html_path,
        entries,
        skipped,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    log::debug!("writing {}", path.display());
    fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
