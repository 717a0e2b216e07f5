// Input side of the transform: a header row followed by data rows.

use crate::cell::CellValue;

/// Random-access grid with a header row at the top.
///
/// `data_rows` yields every row after the header, in order. Rows may be
/// ragged; missing trailing cells read as empty.
pub trait SpreadsheetSource {
    fn header_row(&self) -> Vec<CellValue>;
    fn data_rows(&self) -> Box<dyn Iterator<Item = Vec<CellValue>> + '_>;
}

/// In-memory source. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a grid from a header and data rows.
    pub fn with_header(header: Vec<CellValue>, data: Vec<Vec<CellValue>>) -> Self {
        let mut rows = Vec::with_capacity(data.len() + 1);
        rows.push(header);
        rows.extend(data);
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Total row count including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, col), empty when out of range.
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    /// Write a cell, growing the grid as needed.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }
}

impl SpreadsheetSource for Grid {
    fn header_row(&self) -> Vec<CellValue> {
        self.rows.first().cloned().unwrap_or_default()
    }

    fn data_rows(&self) -> Box<dyn Iterator<Item = Vec<CellValue>> + '_> {
        Box::new(self.rows.iter().skip(1).cloned())
    }
}
