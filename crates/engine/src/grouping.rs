// Grouping & output: sort records so each product forms a contiguous run,
// write them to the "Cleaned" sheet and merge each run's total cell.

use std::cmp::Ordering;

use serde::Serialize;

use crate::aggregate::ProductAggregator;
use crate::cell::CellValue;
use crate::extract::ExtractedRecord;
use crate::workbook::SpreadsheetSink;

/// Output column titles, in order.
pub const CLEANED_HEADERS: [&str; 4] = ["Order Id", "Product Name", "Quantity", "Total Quantity"];

/// Index of the merged total column.
pub const TOTAL_COL: usize = 3;

/// Column sizing for the cleaned sheet, in character units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WidthPolicy {
    pub min: usize,
    pub max: usize,
    pub padding: usize,
}

impl Default for WidthPolicy {
    fn default() -> Self {
        Self {
            min: 8,
            max: 80,
            padding: 2,
        }
    }
}

impl WidthPolicy {
    /// Width for a column whose longest value is `longest` characters.
    pub fn width_for(&self, longest: usize) -> usize {
        (longest + self.padding).min(self.max).max(self.min)
    }
}

/// A maximal run of consecutive output rows sharing one product key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub product_key: String,
    /// Sheet row of the first record (row 0 is the header).
    pub start_row: usize,
    pub len: usize,
}

impl Run {
    pub fn end_row(&self) -> usize {
        self.start_row + self.len - 1
    }
}

fn compare_records(a: &ExtractedRecord, b: &ExtractedRecord) -> Ordering {
    // Empty key sorts after every real key.
    a.product_key
        .is_empty()
        .cmp(&b.product_key.is_empty())
        .then_with(|| a.product_key.cmp(&b.product_key))
        .then_with(|| a.order_id.display().cmp(&b.order_id.display()))
        .then_with(|| a.sequence.cmp(&b.sequence))
}

/// Order by (product key, stringified order id, discovery sequence).
pub fn sort_records(records: &mut [ExtractedRecord]) {
    records.sort_by(compare_records);
}

/// Split sorted records into runs. `first_row` is the sheet row of records[0].
pub fn plan_runs(records: &[ExtractedRecord], first_row: usize) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        match runs.last_mut() {
            Some(run) if run.product_key == record.product_key => run.len += 1,
            _ => runs.push(Run {
                product_key: record.product_key.clone(),
                start_row: first_row + i,
                len: 1,
            }),
        }
    }
    runs
}

/// Longest stringified value per column, header included.
pub fn longest_per_column(rows: &[Vec<CellValue>], columns: usize) -> Vec<usize> {
    let mut longest = vec![0; columns];
    for row in rows {
        for (col, value) in row.iter().take(columns).enumerate() {
            let text = value.display().replace('\n', " ");
            let len = text.trim().chars().count();
            if len > longest[col] {
                longest[col] = len;
            }
        }
    }
    longest
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanedStats {
    pub rows_written: usize,
    pub runs: usize,
    pub merged_ranges: usize,
}

/// Write the cleaned sheet into the sink's current sheet.
///
/// `records` must already be sorted with [`sort_records`].
pub fn write_cleaned<K: SpreadsheetSink + ?Sized>(
    sink: &mut K,
    records: &[ExtractedRecord],
    aggregator: &ProductAggregator,
    widths: &WidthPolicy,
) -> CleanedStats {
    let header: Vec<CellValue> = CLEANED_HEADERS.iter().map(|h| CellValue::from(*h)).collect();
    let mut written = vec![header.clone()];
    let header_row = sink.append_row(header);

    for record in records {
        let row = vec![
            record.order_id.clone(),
            record.display_name.clone().unwrap_or_default(),
            record.quantity.display(),
            CellValue::Empty,
        ];
        written.push(row.clone());
        sink.append_row(row);
    }

    let runs = plan_runs(records, header_row + 1);
    let mut merged_ranges = 0;
    for run in &runs {
        let total = aggregator.present_total_for(&run.product_key);
        written[run.start_row - header_row][TOTAL_COL] = total.clone();
        sink.set_cell(run.start_row, TOTAL_COL, total);
        sink.align_center(run.start_row, TOTAL_COL);
        if run.len > 1 {
            sink.merge_range(run.start_row, TOTAL_COL, run.end_row(), TOTAL_COL);
            merged_ranges += 1;
        }
    }

    for (col, longest) in longest_per_column(&written, CLEANED_HEADERS.len()).into_iter().enumerate() {
        sink.set_column_width(col, widths.width_for(longest) as f64);
    }

    CleanedStats {
        rows_written: records.len(),
        runs: runs.len(),
        merged_ranges,
    }
}
