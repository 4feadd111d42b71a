use std::fmt;
use std::path::Path;

use calamine::{open_workbook_auto, DataType, Range, Reader, SheetVisible};
use log::{info, warn};

use crate::cell::{has_non_null_data, CellValue};
use crate::error::{DumperError, Result};

/// Written in front of formula text so the CSV cell is not re-evaluated
/// when opened in a spreadsheet application.
pub const FORMULA_PREFIX: &str = "FORMULA: =";

/// What to pull out of a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub include_hidden: bool,
    pub include_row_numbers: bool,
    pub include_formulas: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            include_hidden: true,
            include_row_numbers: false,
            include_formulas: false,
        }
    }
}

/// One non-blank worksheet row, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRow {
    pub worksheet: String,
    /// 1-based row index in the worksheet, present when row numbers were requested.
    pub row_number: Option<u32>,
    pub values: Vec<CellValue>,
}

impl ExtractedRow {
    pub fn prefix_width(&self) -> usize {
        if self.row_number.is_some() {
            2
        } else {
            1
        }
    }

    pub fn width(&self) -> usize {
        self.prefix_width() + self.values.len()
    }

    /// Prefix columns followed by the cell values, all as text.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.width());
        fields.push(self.worksheet.clone());
        if let Some(n) = self.row_number {
            fields.push(n.to_string());
        }
        fields.extend(self.values.iter().map(CellValue::to_field));
        fields
    }
}

/// Formula text is only readable from the Open XML containers.
pub fn supports_formulas(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm"))
        .unwrap_or(false)
}

/// Read every worksheet of `path` and return its non-blank rows in
/// worksheet order, then row order.
///
/// Failing to open the workbook is an error. A worksheet that cannot be
/// read is logged and skipped.
pub fn extract_workbook(path: &Path, options: &ExtractOptions) -> Result<Vec<ExtractedRow>> {
    // Formula text only exists in the Open XML containers
    let mut include_formulas = options.include_formulas;
    if include_formulas && !supports_formulas(path) {
        warn!(
            "--formulas only works with .xlsx and .xlsm files; '{}' will be processed with calculated values instead",
            path.display()
        );
        include_formulas = false;
    }

    // Open the workbook (auto-detects the format)
    let mut workbook = open_workbook_auto(path).map_err(|source| DumperError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    // Sheet names and visibility, in workbook order
    let sheets: Vec<(String, bool)> = workbook
        .sheets_metadata()
        .iter()
        .map(|sheet| {
            let hidden = matches!(sheet.visible, SheetVisible::Hidden | SheetVisible::VeryHidden);
            (sheet.name.clone(), hidden)
        })
        .collect();

    let mut rows = Vec::new();
    for (name, hidden) in sheets {
        if hidden && !options.include_hidden {
            warn!("Skipping hidden sheet: {}", name);
            continue;
        }

        // A sheet that cannot be read is reported and skipped
        let values = match loaded(workbook.worksheet_range(&name)) {
            Ok(range) => range,
            Err(e) => {
                warn!("Could not process sheet '{}': {}", name, e);
                continue;
            }
        };
        let formulas = if include_formulas {
            match loaded(workbook.worksheet_formula(&name)) {
                Ok(range) => Some(range),
                Err(e) => {
                    warn!("Could not process sheet '{}': {}", name, e);
                    continue;
                }
            }
        } else {
            None
        };

        let found = sheet_rows(&name, &values, formulas.as_ref(), options.include_row_numbers);
        info!("Sheet '{}': {} rows with data", name, found.len());
        rows.extend(found);
    }

    Ok(rows)
}

fn loaded<T, E: fmt::Display>(
    range: Option<std::result::Result<T, E>>,
) -> std::result::Result<T, String> {
    match range {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(e.to_string()),
        None => Err("worksheet not found".to_string()),
    }
}

/// Flatten one worksheet's used range into rows.
///
/// Every emitted row spans the full column width of the used range; blank
/// cells stay in place as `CellValue::Empty`. When `formulas` is given, a
/// cell carrying formula text emits `FORMULA: =<text>` instead of its value.
pub fn sheet_rows(
    worksheet: &str,
    values: &Range<DataType>,
    formulas: Option<&Range<String>>,
    include_row_numbers: bool,
) -> Vec<ExtractedRow> {
    let Some((top, left, bottom, right)) = used_box(values, formulas) else {
        return Vec::new();
    };

    // Lay the used range out as a dense grid so blank cells keep their column
    let width = (right - left + 1) as usize;
    let height = (bottom - top + 1) as usize;
    let mut grid = vec![vec![CellValue::Empty; width]; height];

    // Walk rows directly: calamine 0.22's Range::get_value loses every
    // column past the range height.
    if let Some((row0, col0)) = values.start() {
        for (r, row) in values.rows().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (gr, gc) = grid_pos(row0, col0, r, c, top, left);
                grid[gr][gc] = CellValue::from(cell);
            }
        }
    }

    // Formula text wins over the cached value
    if let Some((formulas, (row0, col0))) = formulas.and_then(|f| f.start().map(|s| (f, s))) {
        for (r, row) in formulas.rows().enumerate() {
            for (c, formula) in row.iter().enumerate() {
                let formula = formula.trim_start_matches('=');
                if formula.is_empty() {
                    continue;
                }
                let (gr, gc) = grid_pos(row0, col0, r, c, top, left);
                grid[gr][gc] = CellValue::Text(format!("{}{}", FORMULA_PREFIX, formula));
            }
        }
    }

    grid.into_iter()
        .zip(top..)
        .filter(|(cells, _)| has_non_null_data(cells))
        .map(|(cells, row)| ExtractedRow {
            worksheet: worksheet.to_string(),
            row_number: include_row_numbers.then_some(row + 1),
            values: cells,
        })
        .collect()
}

// (top, left, bottom, right), absolute and inclusive
fn used_box(
    values: &Range<DataType>,
    formulas: Option<&Range<String>>,
) -> Option<(u32, u32, u32, u32)> {
    let boxes = [
        values.start().zip(values.end()),
        formulas.and_then(|f| f.start().zip(f.end())),
    ];
    boxes
        .into_iter()
        .flatten()
        .map(|(start, end)| (start.0, start.1, end.0, end.1))
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
}

// Position inside the grid of cell (r, c) of a range starting at (row0, col0)
fn grid_pos(row0: u32, col0: u32, r: usize, c: usize, top: u32, left: u32) -> (usize, usize) {
    (
        (row0 - top) as usize + r,
        (col0 - left) as usize + c,
    )
}
