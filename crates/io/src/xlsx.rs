// Excel file import (xlsx, xls, xlsb, ods) and export (xlsx only)
//
// Import: first sheet only, values as calamine extracted them.
// Export: renders a finished engine `Workbook`. The file is built in memory
//         and moved into place only once complete.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Format, FormatAlign, Workbook as XlsxWorkbook, Worksheet};
use sheetclean_engine::sheet::Sheet;
use sheetclean_engine::{CellValue, CleanError, Grid, Workbook};

/// Maximum dimensions read from an input sheet
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Convert a calamine cell into an engine value.
fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => {
            if s.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Int(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        // Store error as text representation
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        // Dates come through as their serial number
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Import the first sheet of an Excel file as a grid.
pub fn import(path: &Path) -> Result<Grid, CleanError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| {
        CleanError::InputUnreadable(format!("Failed to open Excel file: {}", e))
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(CleanError::InputUnreadable("Excel file contains no sheets".to_string()));
    };
    if sheet_names.len() > 1 {
        log::debug!(
            "reading sheet '{}', ignoring {} other sheet(s)",
            sheet_name,
            sheet_names.len() - 1
        );
    }

    let range = workbook.worksheet_range(sheet_name).map_err(|e| {
        CleanError::InputUnreadable(format!("Failed to read sheet '{}': {}", sheet_name, e))
    })?;

    let mut grid = Grid::default();
    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return Ok(grid);
    }

    // Range start offset (data may not begin at A1)
    let (data_start_row, data_start_col) = range.start().unwrap_or((0, 0));

    for (row_idx, row) in range.rows().enumerate() {
        let target_row = data_start_row as usize + row_idx;
        if target_row >= MAX_ROWS {
            break;
        }
        for (col_idx, cell) in row.iter().enumerate() {
            let target_col = data_start_col as usize + col_idx;
            if target_col >= MAX_COLS {
                break;
            }
            let value = cell_from_data(cell);
            if value != CellValue::Empty {
                grid.set(target_row, target_col, value);
            }
        }
    }

    Ok(grid)
}

/// Result of an Excel export operation
#[derive(Debug, Default)]
pub struct ExportResult {
    pub sheets_exported: usize,
    pub cells_exported: usize,
    pub merges_exported: usize,
}

impl ExportResult {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        format!(
            "{} sheet{}, {} cells, {} merged range{}",
            self.sheets_exported,
            if self.sheets_exported == 1 { "" } else { "s" },
            self.cells_exported,
            self.merges_exported,
            if self.merges_exported == 1 { "" } else { "s" },
        )
    }
}

/// Export an engine workbook to XLSX.
///
/// The destination is replaced atomically: bytes go to a sibling temp file
/// which is renamed over `path`. On failure `path` is left untouched.
pub fn export(workbook: &Workbook, path: &Path) -> Result<ExportResult, CleanError> {
    let (bytes, result) = render(workbook)?;

    write_atomic(path, &bytes)?;
    log::debug!("wrote {} ({})", path.display(), result.summary());
    Ok(result)
}

/// Write `bytes` to a hidden sibling temp file, then rename it over `path`.
/// The temp file never outlives a failed write or rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CleanError> {
    let tmp = temp_path_for(path);
    let outcome = fs::write(&tmp, bytes)
        .map_err(|e| CleanError::Output(format!("Failed to write {}: {}", tmp.display(), e)))
        .and_then(|()| {
            fs::rename(&tmp, path).map_err(|e| {
                CleanError::Output(format!(
                    "Failed to move output into place at {}: {}",
                    path.display(),
                    e
                ))
            })
        });
    if outcome.is_err() && tmp.is_file() {
        let _ = fs::remove_file(&tmp);
    }
    outcome
}

/// Render a workbook to XLSX bytes.
pub fn render(workbook: &Workbook) -> Result<(Vec<u8>, ExportResult), CleanError> {
    let mut result = ExportResult::default();
    let mut xlsx_workbook = XlsxWorkbook::new();

    for sheet in workbook.sheets() {
        let worksheet = xlsx_workbook
            .add_worksheet()
            .set_name(&sheet.name)
            .map_err(|e| CleanError::Output(format!("Failed to create sheet '{}': {}", sheet.name, e)))?;

        // Merged regions first: merge_range() writes a blank origin cell that
        // export_sheet_cells() then overwrites with the real value.
        let merge_format = centered_format();
        for merge in &sheet.merged_regions {
            worksheet
                .merge_range(
                    merge.start.0 as u32,
                    merge.start.1 as u16,
                    merge.end.0 as u32,
                    merge.end.1 as u16,
                    "",
                    &merge_format,
                )
                .map_err(|e| CleanError::Output(format!("Failed to write merge: {}", e)))?;
            result.merges_exported += 1;
        }

        result.cells_exported += export_sheet_cells(sheet, worksheet)?;

        for (col, width) in &sheet.col_widths {
            worksheet
                .set_column_width(*col as u16, *width)
                .map_err(|e| CleanError::Output(format!("Failed to set column {} width: {}", col, e)))?;
        }

        result.sheets_exported += 1;
    }

    let bytes = xlsx_workbook
        .save_to_buffer()
        .map_err(|e| CleanError::Output(format!("Failed to build XLSX file: {}", e)))?;
    Ok((bytes, result))
}

fn centered_format() -> Format {
    Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// Write cell values. Returns the number of cells written.
fn export_sheet_cells(sheet: &Sheet, worksheet: &mut Worksheet) -> Result<usize, CleanError> {
    let mut cells_exported = 0;
    let plain = Format::new();
    let centered = centered_format();

    for ((row, col), value) in sheet.cells_iter() {
        // Only the merge origin carries a value
        if sheet.is_merge_hidden(row, col) {
            continue;
        }

        let row32 = row as u32;
        let col16 = col as u16;
        let format = if sheet.centered.contains(&(row, col)) { &centered } else { &plain };
        let err = |e: rust_xlsxwriter::XlsxError| {
            CleanError::Output(format!("Failed to write cell ({}, {}): {}", row, col, e))
        };

        match value {
            CellValue::Empty => continue,
            CellValue::Text(s) => {
                worksheet.write_string_with_format(row32, col16, s, format).map_err(err)?;
            }
            CellValue::Int(n) => {
                worksheet
                    .write_number_with_format(row32, col16, *n as f64, format)
                    .map_err(err)?;
            }
            CellValue::Number(n) => {
                worksheet.write_number_with_format(row32, col16, *n, format).map_err(err)?;
            }
            CellValue::Bool(b) => {
                worksheet.write_boolean_with_format(row32, col16, *b, format).map_err(err)?;
            }
        }
        cells_exported += 1;
    }

    // Centered cells that ended up empty (totals with no value) still get the style
    for &(row, col) in &sheet.centered {
        let is_empty = matches!(sheet.get(row, col), None | Some(CellValue::Empty));
        if is_empty && !sheet.merged_regions.iter().any(|m| m.contains(row, col)) {
            worksheet
                .write_blank(row as u32, col as u16, &centered)
                .map_err(|e| CleanError::Output(format!("Failed to write cell ({}, {}): {}", row, col, e)))?;
        }
    }

    Ok(cells_exported)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.xlsx".to_string());
    path.with_file_name(format!(".{}.tmp-{}", file_name, std::process::id()))
}
