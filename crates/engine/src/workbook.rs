// Output side of the transform.
//
// The engine only talks to `SpreadsheetSink`. `Workbook` is the in-memory
// implementation; file encoders (xlsx) render a finished `Workbook` in one
// shot, so nothing reaches disk until the transform has completed.

use crate::cell::CellValue;
use crate::sheet::{MergedRegion, Sheet};

/// Write target for the transform. Rows and columns are 0-based.
///
/// All row/cell operations apply to the most recently created sheet.
pub trait SpreadsheetSink {
    fn new_sheet(&mut self, name: &str);
    /// Append a row to the current sheet, returning its index.
    fn append_row(&mut self, values: Vec<CellValue>) -> usize;
    fn set_cell(&mut self, row: usize, col: usize, value: CellValue);
    fn merge_range(&mut self, start_row: usize, start_col: usize, end_row: usize, end_col: usize);
    fn set_column_width(&mut self, col: usize, width: f64);

    /// Styling hook for sinks that support it.
    fn align_center(&mut self, _row: usize, _col: usize) {}
}

/// A workbook holding the finished output sheets.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn current(&mut self) -> &mut Sheet {
        if self.sheets.is_empty() {
            self.sheets.push(Sheet::new("Sheet1"));
        }
        let last = self.sheets.len() - 1;
        &mut self.sheets[last]
    }
}

impl SpreadsheetSink for Workbook {
    fn new_sheet(&mut self, name: &str) {
        self.sheets.push(Sheet::new(name));
    }

    fn append_row(&mut self, values: Vec<CellValue>) -> usize {
        self.current().push_row(values)
    }

    fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        self.current().set(row, col, value);
    }

    fn merge_range(&mut self, start_row: usize, start_col: usize, end_row: usize, end_col: usize) {
        self.current()
            .merged_regions
            .push(MergedRegion::new((start_row, start_col), (end_row, end_col)));
    }

    fn set_column_width(&mut self, col: usize, width: f64) {
        self.current().col_widths.insert(col, width);
    }

    fn align_center(&mut self, row: usize, col: usize) {
        self.current().centered.insert((row, col));
    }
}
