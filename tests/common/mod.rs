//! Fixtures shared by the integration tests.
//!
//! The JPEG and stylesheet builders are the crate's own unit-test helpers,
//! included from `src/test_helpers.rs` so both suites build photos the same way.

#![allow(dead_code)]

#[path = "../../src/test_helpers.rs"]
mod fixtures;

pub use fixtures::*;

use std::path::{Path, PathBuf};
use std::process::Command;

/// The three-photo scenario: 1 and 3 captioned, 2 left bare.
pub fn three_photo_dir(root: &Path) -> PathBuf {
    let dir = root.join("photos");
    std::fs::create_dir_all(&dir).unwrap();
    write_jpeg(&dir, "IMG_001.jpg", 400, 300, &ExifSpec::comment("Cracked tile"));
    write_jpeg(&dir, "IMG_002.jpg", 400, 300, &ExifSpec::default());
    write_jpeg(&dir, "IMG_003.jpg", 300, 400, &ExifSpec::comment("Loose railing"));
    dir
}

pub fn pandoc_available() -> bool {
    Command::new("pandoc").arg("--version").output().is_ok()
}

/// Data URIs embedded in the markup, in document order.
pub fn data_uris(markup: &str) -> Vec<String> {
    markup
        .lines()
        .filter_map(|l| l.strip_prefix("![]("))
        .filter_map(|l| l.split_once(')').map(|(uri, _)| uri.to_string()))
        .collect()
}
