use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a dump run.
///
/// Display text names the failing path only; the underlying cause is
/// reachable through `source()`. Problems confined to a single worksheet
/// never show up here; they are logged and the sheet is skipped.
#[derive(Debug, Error)]
pub enum DumperError {
    #[error("File '{}' not found.", .0.display())]
    FileNotFound(PathBuf),

    #[error("No Excel files found in directory: {}", .0.display())]
    NoCandidates(PathBuf),

    #[error("Error reading Excel file '{}'", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Error writing to CSV file '{}'", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Error writing to JSON file '{}'", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DumperError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        DumperError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DumperError>;
