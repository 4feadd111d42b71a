use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{DumperError, Result};
use crate::extract::ExtractedRow;

/// What a writer produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Widest row, prefix columns included.
pub fn max_width(rows: &[ExtractedRow]) -> usize {
    rows.iter().map(ExtractedRow::width).max().unwrap_or(0)
}

/// `Worksheet`, optionally `Row_Number`, then `Column_1..Column_N` up to `width`.
pub fn header(width: usize, include_row_numbers: bool) -> Vec<String> {
    let mut header = vec!["Worksheet".to_string()];
    if include_row_numbers {
        header.push("Row_Number".to_string());
    }
    let data_columns = width.saturating_sub(header.len());
    header.extend((1..=data_columns).map(|i| format!("Column_{}", i)));
    header
}

/// Write the header and every row as CSV. Short rows are padded with
/// empty fields so all records have the same length.
pub fn write_csv_to<W: Write>(
    rows: &[ExtractedRow],
    writer: W,
    include_row_numbers: bool,
) -> csv::Result<usize> {
    let header = header(max_width(rows), include_row_numbers);
    let width = header.len();
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(&header)?;
    for row in rows {
        let mut fields = row.fields();
        fields.resize(width, String::new());
        wtr.write_record(&fields)?;
    }
    wtr.flush()?;
    Ok(width)
}

pub fn write_csv(
    rows: &[ExtractedRow],
    path: &Path,
    include_row_numbers: bool,
) -> Result<WriteSummary> {
    let csv_error = |source| DumperError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(|e| csv_error(e.into()))?;
    let columns = write_csv_to(rows, BufWriter::new(file), include_row_numbers).map_err(csv_error)?;

    Ok(WriteSummary {
        path: path.to_path_buf(),
        rows: rows.len(),
        columns,
    })
}

/// One JSON object per row, keyed by header name in column order. Blank
/// cells are left out of the object.
pub fn json_rows(rows: &[ExtractedRow], include_row_numbers: bool) -> Vec<Value> {
    let header = header(max_width(rows), include_row_numbers);

    rows.iter()
        .map(|row| {
            let mut object = Map::new();
            object.insert(header[0].clone(), Value::String(row.worksheet.clone()));
            if let Some(n) = row.row_number {
                object.insert(header[1].clone(), Value::from(n));
            }
            let offset = row.prefix_width();
            for (i, cell) in row.values.iter().enumerate() {
                if cell.is_blank() {
                    continue;
                }
                if let Some(key) = header.get(offset + i) {
                    object.insert(key.clone(), cell.to_json());
                }
            }
            Value::Object(object)
        })
        .collect()
}

pub fn write_json(
    rows: &[ExtractedRow],
    path: &Path,
    include_row_numbers: bool,
) -> Result<WriteSummary> {
    let io_error = |e| DumperError::io(format!("Error writing to JSON file '{}'", path.display()), e);
    let file = File::create(path).map_err(io_error)?;
    let mut out = BufWriter::new(file);
    let document = Value::Array(json_rows(rows, include_row_numbers));
    serde_json::to_writer_pretty(&mut out, &document).map_err(|source| DumperError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    out.flush().map_err(io_error)?;

    Ok(WriteSummary {
        path: path.to_path_buf(),
        rows: rows.len(),
        columns: max_width(rows),
    })
}
