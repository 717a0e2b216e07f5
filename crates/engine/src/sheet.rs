use std::collections::{BTreeMap, BTreeSet};

use crate::cell::CellValue;

/// A rectangular merged cell range, inclusive on both ends, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRegion {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl MergedRegion {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start.0 && row <= self.end.0 && col >= self.start.1 && col <= self.end.1
    }

    /// Cells hidden behind the origin cell.
    pub fn is_hidden(&self, row: usize, col: usize) -> bool {
        self.contains(row, col) && (row, col) != self.start
    }
}

/// One output sheet: dense rows plus presentation metadata.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<CellValue>>,
    pub merged_regions: Vec<MergedRegion>,
    pub col_widths: BTreeMap<usize, f64>,
    pub centered: BTreeSet<(usize, usize)>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a row, returning its 0-based index.
    pub fn push_row(&mut self, values: Vec<CellValue>) -> usize {
        self.rows.push(values);
        self.rows.len() - 1
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

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

    pub fn is_merge_hidden(&self, row: usize, col: usize) -> bool {
        self.merged_regions.iter().any(|m| m.is_hidden(row, col))
    }

    /// Iterate non-empty cells as ((row, col), value).
    pub fn cells_iter(&self) -> impl Iterator<Item = ((usize, usize), &CellValue)> {
        self.rows.iter().enumerate().flat_map(|(r, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, v)| !matches!(v, CellValue::Empty))
                .map(move |(c, v)| ((r, c), v))
        })
    }
}
