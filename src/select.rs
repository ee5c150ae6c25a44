//! Photo selection.
//!
//! Walks the immediate entries of the photo directory and turns every photo
//! with a caption into a [`PhotoEntry`]. The caption doubles as the inclusion
//! filter: a photo whose comment field is empty or missing is skipped without
//! complaint, which is how work-in-progress shots stay out of the report.
//!
//! ## Rules
//!
//! - No recursion and no extension filtering: every entry is decoded.
//! - Anything that fails to decode aborts the run. A report with silently
//!   missing photos is worse than no report.
//! - Order is either the directory listing order or file-name order, see
//!   [`PhotoOrder`]. Numbering in the report follows it.
//!
//! ## Laziness
//!
//! [`select_photos`] lists the directory up front (so a missing directory
//! fails immediately) and returns a [`Photos`] iterator that decodes one file
//! per step. Calling it again re-reads the directory.

use crate::config::{PhotoOrder, ReportConfig};
use crate::imaging::{BackendError, ImageBackend, NormalizeParams, normalize};
use crate::metadata::extract_caption;
use crate::types::PhotoEntry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("Cannot read photo directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
}

/// Selection settings derived from [`ReportConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    pub order: PhotoOrder,
    pub normalize: NormalizeParams,
}

impl SelectOptions {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            order: config.photos.order,
            normalize: NormalizeParams {
                max_dimension: config.photos.max_dimension,
            },
        }
    }
}

/// Lazy sequence of captioned photos from one directory listing.
pub struct Photos<'a, B: ImageBackend> {
    backend: &'a B,
    paths: std::vec::IntoIter<PathBuf>,
    normalize: NormalizeParams,
    skipped: Vec<PathBuf>,
}

impl<B: ImageBackend> Photos<'_, B> {
    /// Files passed over so far because they carry no caption.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }
}

impl<B: ImageBackend> Iterator for Photos<'_, B> {
    type Item = Result<PhotoEntry, SelectError>;

    fn next(&mut self) -> Option<Self::Item> {
        for path in self.paths.by_ref() {
            match select_one(self.backend, &path, &self.normalize) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => {
                    log::debug!("skipping {}: no caption", path.display());
                    self.skipped.push(path);
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// List `dir` and return an iterator over its captioned photos.
pub fn select_photos<'a, B: ImageBackend>(
    backend: &'a B,
    dir: &Path,
    options: &SelectOptions,
) -> Result<Photos<'a, B>, SelectError> {
    let paths = list_entries(dir, options.order)?;
    log::debug!("{} entries in {}", paths.len(), dir.display());

    Ok(Photos {
        backend,
        paths: paths.into_iter(),
        normalize: options.normalize,
        skipped: Vec::new(),
    })
}

/// Immediate entries of `dir`, in the requested order.
fn list_entries(dir: &Path, order: PhotoOrder) -> Result<Vec<PathBuf>, SelectError> {
    let read_dir = fs::read_dir(dir).map_err(|source| SelectError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in read_dir {
        paths.push(entry?.path());
    }

    if order == PhotoOrder::Name {
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }
    Ok(paths)
}

/// Decode one file; `None` when it has no caption.
///
/// The caption is read from the same decode pass before normalization, and
/// photos without one are never resized.
fn select_one(
    backend: &impl ImageBackend,
    path: &Path,
    params: &NormalizeParams,
) -> Result<Option<PhotoEntry>, SelectError> {
    let decoded = backend.decode(path)?;
    let caption = extract_caption(decoded.comment.as_deref());
    if caption.is_empty() {
        return Ok(None);
    }

    let image = normalize(decoded.image, decoded.orientation, params);
    Ok(Some(PhotoEntry {
        source_path: path.to_path_buf(),
        image,
        caption,
    }))
}
