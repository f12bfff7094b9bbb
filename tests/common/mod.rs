//! Common test utilities module
//!
//! Temporary files live inside a [`tempfile::TempDir`] and are removed
//! when the returned guard is dropped.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use insightrs::{RawBlock, RawCell};
use tempfile::TempDir;

/// RAII wrapper for a temporary test file
pub struct TempTestFile {
    _dir: TempDir,
    path: PathBuf,
}

impl TempTestFile {
    /// Path of a not-yet-created file inside a fresh temporary directory
    pub fn new(test_name: &str, extension: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix("insightrs_test_")
            .tempdir()
            .expect("Failed to create temp dir");
        let path = dir.path().join(format!("{}.{}", test_name, extension));
        TempTestFile { _dir: dir, path }
    }

    /// Creates the file with `content`
    pub fn with_content(test_name: &str, extension: &str, content: &str) -> Self {
        let file = Self::new(test_name, extension);
        fs::write(&file.path, content).expect("Failed to write temp file");
        file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Shorthand for a text cell
pub fn t(s: &str) -> RawCell {
    RawCell::from(s)
}

/// Shorthand for a numeric cell
pub fn n(v: f64) -> RawCell {
    RawCell::from(v)
}

/// Blank cell
pub fn e() -> RawCell {
    RawCell::Empty
}

/// The three-column sales sheet with a blank banner row
pub fn sales_block() -> RawBlock {
    RawBlock::new(vec![
        vec![t(""), t(""), t("")],
        vec![t("Date"), t("Sales"), t("Qty")],
        vec![t("2024-01"), n(100.0), n(5.0)],
        vec![t("2024-02"), n(150.0), n(7.0)],
    ])
}
