use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::info;

use crate::error::{DumperError, Result};

/// Workbook extensions picked up when scanning a directory.
pub const EXCEL_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsm", "xlsb"];

pub fn is_excel_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXCEL_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Find the most recently modified workbook directly inside `dir`.
pub fn find_newest_excel_file(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| {
        DumperError::io(format!("Failed to read directory '{}'", dir.display()), e)
    })?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !path.is_file() || !is_excel_file(&path) {
            continue;
        }
        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => continue,
        };
        if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| DumperError::NoCandidates(dir.to_path_buf()))
}

/// Decide which workbook to process.
///
/// A relative `file` is looked up inside `input_dir` when one is given.
/// Without `file`, the newest workbook in `input_dir` (or the current
/// directory) is used.
pub fn resolve_input_file(file: Option<&Path>, input_dir: Option<&Path>) -> Result<PathBuf> {
    match file {
        Some(file) => {
            let path = match input_dir {
                Some(dir) if file.is_relative() => dir.join(file),
                _ => file.to_path_buf(),
            };
            if !path.exists() {
                return Err(DumperError::FileNotFound(path));
            }
            Ok(path)
        }
        None => {
            let dir = input_dir.unwrap_or_else(|| Path::new("."));
            let path = find_newest_excel_file(dir)?;
            info!(
                "Processing newest Excel file: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );
            info!("From directory: {}", dir.display());
            Ok(path)
        }
    }
}
