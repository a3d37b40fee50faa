//! File import and export

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// An encoded forest ready to be saved under a timestamped name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
}

/// `TreeData_2024-05-01_13-45-07.json`: UTC, second precision
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("TreeData_{}.json", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Write an export into `dir`, returning the full path
pub fn write_export(dir: &Path, export: &Export) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(&export.file_name);
    fs::write(&path, &export.contents)
        .with_context(|| format!("Failed to write export {}", path.display()))?;
    info!("Exported tree to {}", path.display());
    Ok(path)
}

/// Read a user-picked import file as UTF-8 text
pub fn read_import(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file {}", path.display()))
}
