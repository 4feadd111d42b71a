//! Flatten the worksheets of an Excel workbook into a single CSV or JSON file.
//!
//! Every non-blank row of every worksheet becomes one output record, prefixed
//! with the worksheet name and, optionally, the source row number.

pub mod cell;
pub mod discover;
pub mod error;
pub mod extract;
pub mod naming;
pub mod writer;

use std::path::PathBuf;

use log::info;

pub use cell::CellValue;
pub use error::{DumperError, Result};
pub use extract::{extract_workbook, ExtractOptions, ExtractedRow};
pub use naming::OutputFormat;
pub use writer::WriteSummary;

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct DumpConfig {
    pub file: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub options: ExtractOptions,
}

impl Default for DumpConfig {
    fn default() -> Self {
        DumpConfig {
            file: None,
            input_dir: None,
            output_dir: None,
            format: OutputFormat::Csv,
            options: ExtractOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpOutcome {
    /// The workbook had no non-blank rows; nothing was written.
    NoData { source: PathBuf },
    Written(WriteSummary),
}

/// Locate the workbook, extract it and write the output file.
pub fn dump(config: &DumpConfig) -> Result<DumpOutcome> {
    // Pick the workbook: explicit file or newest in the input directory
    let source = discover::resolve_input_file(config.file.as_deref(), config.input_dir.as_deref())?;
    let options = &config.options;

    info!("Extracting data from: {}", source.display());
    info!("Including hidden sheets: {}", options.include_hidden);
    info!("Including row numbers: {}", options.include_row_numbers);
    info!("Including formulas: {}", options.include_formulas);
    info!("Output format: {}", config.format.extension().to_uppercase());

    // Pull every non-blank row; an empty result writes nothing
    let rows = extract_workbook(&source, options)?;
    if rows.is_empty() {
        return Ok(DumpOutcome::NoData { source });
    }

    // Name the output after the source and never overwrite
    let output = naming::generate_output_path(&source, config.output_dir.as_deref(), config.format)?;
    let summary = match config.format {
        OutputFormat::Csv => writer::write_csv(&rows, &output, options.include_row_numbers)?,
        OutputFormat::Json => writer::write_json(&rows, &output, options.include_row_numbers)?,
    };
    Ok(DumpOutcome::Written(summary))
}
