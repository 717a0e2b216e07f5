use serde::Serialize;

use crate::aggregate::ProductAggregator;
use crate::error::CleanError;
use crate::extract::{extract_records, ExtractStats};
use crate::grouping::{sort_records, write_cleaned, CleanedStats, WidthPolicy};
use crate::header::{resolve_headers, HeaderMap};
use crate::source::SpreadsheetSource;
use crate::summary::{compute_summary, write_summary, Summary};
use crate::workbook::{SpreadsheetSink, Workbook};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformOptions {
    pub cleaned_sheet: String,
    pub summary_sheet: String,
    pub widths: WidthPolicy,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            cleaned_sheet: "Cleaned".to_string(),
            summary_sheet: "Summary".to_string(),
            widths: WidthPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformReport {
    pub rows_read: usize,
    pub rows_without_order_id: usize,
    pub records: usize,
    pub non_numeric_quantities: usize,
    pub runs: usize,
    pub merged_ranges: usize,
    pub summary: Summary,
}

impl TransformReport {
    fn new(extract: &ExtractStats, cleaned: &CleanedStats, summary: Summary) -> Self {
        Self {
            rows_read: extract.rows_read,
            rows_without_order_id: extract.rows_without_order_id,
            records: cleaned.rows_written,
            non_numeric_quantities: extract.non_numeric_quantities,
            runs: cleaned.runs,
            merged_ranges: cleaned.merged_ranges,
            summary,
        }
    }

    /// One-line description for status output.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} row{} -> {} record{} in {} product group{}",
            self.rows_read,
            if self.rows_read == 1 { "" } else { "s" },
            self.records,
            if self.records == 1 { "" } else { "s" },
            self.runs,
            if self.runs == 1 { "" } else { "s" },
        );
        if self.rows_without_order_id > 0 {
            line.push_str(&format!(", {} skipped (no order id)", self.rows_without_order_id));
        }
        line
    }
}

/// Resolve headers only, without reading data rows.
pub fn inspect<S: SpreadsheetSource + ?Sized>(source: &S) -> Result<HeaderMap, CleanError> {
    resolve_headers(&source.header_row())
}

/// Run the full pipeline into `sink`.
///
/// Header problems are reported before anything is written to the sink.
pub fn transform_into<S, K>(
    source: &S,
    sink: &mut K,
    options: &TransformOptions,
) -> Result<TransformReport, CleanError>
where
    S: SpreadsheetSource + ?Sized,
    K: SpreadsheetSink + ?Sized,
{
    let headers = resolve_headers(&source.header_row())?;

    let (mut records, extract_stats) = extract_records(&headers, source.data_rows());
    let aggregator = ProductAggregator::from_records(&records);
    sort_records(&mut records);

    sink.new_sheet(&options.cleaned_sheet);
    let cleaned_stats = write_cleaned(sink, &records, &aggregator, &options.widths);

    let summary = compute_summary(&aggregator);
    sink.new_sheet(&options.summary_sheet);
    write_summary(sink, &summary);

    let report = TransformReport::new(&extract_stats, &cleaned_stats, summary);
    log::info!("{}", report.summary_line());
    Ok(report)
}

/// Run the pipeline into a fresh in-memory workbook.
pub fn transform<S: SpreadsheetSource + ?Sized>(
    source: &S,
    options: &TransformOptions,
) -> Result<(Workbook, TransformReport), CleanError> {
    let mut workbook = Workbook::new();
    let report = transform_into(source, &mut workbook, options)?;
    Ok((workbook, report))
}
