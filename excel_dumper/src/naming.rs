use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, SecondsFormat, TimeZone};

use crate::error::{DumperError, Result};

const FILE_PREFIX: &str = "dumper";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// ISO 8601 with offset, colons swapped for hyphens so the result is a
/// valid file name everywhere (`2025-07-21T14-30-52-05-00`).
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.to_rfc3339_opts(SecondsFormat::Secs, false)
        .replace(':', "-")
}

/// `dumper_<stem>_<timestamp>` for a source modified at `modified`, in local time.
pub fn base_file_name(source: &Path, modified: SystemTime) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let local: DateTime<Local> = modified.into();
    format!("{}_{}_{}", FILE_PREFIX, stem, format_timestamp(&local))
}

/// First of `<base>.<ext>`, `<base>(1).<ext>`, `<base>(2).<ext>`, ... that
/// does not exist yet.
pub fn available_path(dir: &Path, base: &str, extension: &str) -> PathBuf {
    let mut counter = 0u32;
    loop {
        let name = if counter == 0 {
            format!("{}.{}", base, extension)
        } else {
            format!("{}({}).{}", base, counter, extension)
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Pick the output path for `source`, creating `output_dir` if needed.
/// Without an output directory the file lands in the current directory.
pub fn generate_output_path(
    source: &Path,
    output_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<PathBuf> {
    let modified = fs::metadata(source)
        .and_then(|m| m.modified())
        .map_err(|e| {
            DumperError::io(
                format!("Failed to read modification time of '{}'", source.display()),
                e,
            )
        })?;

    let dir = match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| {
                DumperError::io(
                    format!("Failed to create output directory '{}'", dir.display()),
                    e,
                )
            })?;
            dir.to_path_buf()
        }
        None => PathBuf::new(),
    };

    let base = base_file_name(source, modified);
    Ok(available_path(&dir, &base, format.extension()))
}
