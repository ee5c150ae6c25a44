//! Report configuration.
//!
//! Handles loading, validating, and merging `report.toml`. Every setting has a
//! stock default; a config file only overrides the keys it names.
//!
//! ## Config File Location
//!
//! `report.toml` in the working directory is picked up automatically. A
//! different file can be given with `--config <path>`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [photos]
//! order = "directory"       # "directory" (as listed) or "name" (sorted)
//! max_dimension = 900       # Longer edge of embedded photos, in pixels
//!
//! [render]
//! title_prefix = "Home Owner's Report for"
//! image_width = "90%"       # Display width hint on each photo
//! jpeg_quality = 75         # Quality of the embedded JPEGs (1-100)
//!
//! [convert]
//! converter = "pandoc"      # "pandoc" or "builtin"
//! program = "pandoc"        # Executable used by the pandoc converter
//! stylesheet = "style.css"  # Included verbatim in the HTML <head>
//! toc_depth = 6             # Deepest heading level listed in the contents
//!
//! [output]
//! stem = "report"           # Writes report.md and report.html
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "report.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Report configuration loaded from `report.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Photo selection and sizing.
    pub photos: PhotosConfig,
    /// Markup rendering.
    pub render: RenderConfig,
    /// Markup → HTML conversion.
    pub convert: ConvertConfig,
    /// Output file naming.
    pub output: OutputConfig,
}

impl ReportConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.photos.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "photos.max_dimension must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.render.jpeg_quality) {
            return Err(ConfigError::Validation(
                "render.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.render.image_width.trim().is_empty() {
            return Err(ConfigError::Validation(
                "render.image_width must not be empty".into(),
            ));
        }
        if !(1..=6).contains(&self.convert.toc_depth) {
            return Err(ConfigError::Validation(
                "convert.toc_depth must be 1-6".into(),
            ));
        }
        if self.convert.program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "convert.program must not be empty".into(),
            ));
        }
        if self.output.stem.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.stem must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Order in which photos are numbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoOrder {
    /// Whatever order the filesystem lists the directory in.
    #[default]
    Directory,
    /// Sorted by file name.
    Name,
}

/// Photo selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotosConfig {
    pub order: PhotoOrder,
    /// Longer edge of each embedded photo, in pixels.
    pub max_dimension: u32,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            order: PhotoOrder::Directory,
            max_dimension: 900,
        }
    }
}

/// Markup rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Title line is `<title_prefix> <property address>`.
    pub title_prefix: String,
    /// Value of the `{width=...}` attribute on every photo.
    pub image_width: String,
    pub jpeg_quality: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title_prefix: "Home Owner's Report for".to_string(),
            image_width: "90%".to_string(),
            jpeg_quality: 75,
        }
    }
}

/// Which converter turns the markup into HTML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// External `pandoc` process.
    #[default]
    Pandoc,
    /// In-process pulldown-cmark renderer.
    Builtin,
}

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub converter: ConverterKind,
    pub program: String,
    /// Relative paths resolve against the working directory.
    pub stylesheet: String,
    pub toc_depth: u8,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            converter: ConverterKind::Pandoc,
            program: "pandoc".to_string(),
            stylesheet: "style.css".to_string(),
            toc_depth: 6,
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// File stem shared by the markup and HTML outputs.
    pub stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            stem: "report".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ReportConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ReportConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ReportConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<ReportConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `report.toml` from the given directory, or stock defaults when absent.
pub fn load_config(dir: &Path) -> Result<ReportConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return resolve_config(None);
    }
    load_config_file(&path)
}

/// Returns a fully-commented stock `report.toml`.
///
/// Printed by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# house-report configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys are an error.

# ---------------------------------------------------------------------------
# Photos
# ---------------------------------------------------------------------------
[photos]
# Numbering order of the report entries.
#   "directory" - the order the filesystem lists the photo directory in
#                 (platform dependent)
#   "name"      - sorted by file name
order = "directory"

# Longer edge of every embedded photo, in pixels. Smaller photos are scaled up.
max_dimension = 900

# ---------------------------------------------------------------------------
# Markup rendering
# ---------------------------------------------------------------------------
[render]
# The report title is this prefix followed by the property address.
title_prefix = "Home Owner's Report for"

# Display width hint attached to every photo.
image_width = "90%"

# JPEG quality of the embedded photos (1 = smallest, 100 = best).
jpeg_quality = 75

# ---------------------------------------------------------------------------
# HTML conversion
# ---------------------------------------------------------------------------
[convert]
# "pandoc" runs the external pandoc program; "builtin" converts in-process.
converter = "pandoc"

# Executable used by the pandoc converter.
program = "pandoc"

# File included verbatim in the HTML <head>. Wrap CSS in <style> tags.
stylesheet = "style.css"

# Deepest heading level listed in the table of contents (1-6).
toc_depth = 6

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Writes <stem>.md and <stem>.html into the working directory.
stem = "report"
"##
}
