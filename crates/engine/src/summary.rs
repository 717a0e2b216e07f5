use serde::Serialize;

use crate::aggregate::ProductAggregator;
use crate::cell::{present_number, CellValue};
use crate::workbook::SpreadsheetSink;

const SUMMARY_TITLE: &str = "Output Summary";
const TOTAL_LABEL: &str = "Total quantity (numeric)";
const UNIQUE_LABEL: &str = "Unique products";
const PRODUCT_LABEL: &str = "Product name";
const BEST_LABEL: &str = "Best-selling product";
const BEST_AMOUNT_LABEL: &str = "Sales amount (numeric)";

/// Fixed label/value column widths for the summary sheet.
pub const SUMMARY_WIDTHS: [f64; 2] = [40.0, 22.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProduct {
    pub key: String,
    pub display_name: CellValue,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of every product's running total, the empty key included.
    pub total_quantity: f64,
    /// Distinct non-empty product keys seen.
    pub unique_products: usize,
    /// Non-empty keys with at least one numeric quantity, best first.
    pub ranked: Vec<RankedProduct>,
}

impl Summary {
    /// Top ranked product, if its total is a real number.
    pub fn best_selling(&self) -> Option<&RankedProduct> {
        self.ranked.first().filter(|p| p.total.is_finite())
    }
}

/// Compute summary statistics from the final aggregator state.
///
/// Ranking is by total descending; equal totals fall back to the product key
/// ascending so the order is deterministic. NaN totals rank last.
pub fn compute_summary(aggregator: &ProductAggregator) -> Summary {
    let mut total_quantity = 0.0;
    let mut unique_products = 0;
    let mut ranked = Vec::new();

    for (key, agg) in aggregator.iter() {
        total_quantity += agg.raw_sum();
        if key.is_empty() {
            continue;
        }
        unique_products += 1;
        if let Some(total) = agg.total() {
            ranked.push(RankedProduct {
                key: key.to_string(),
                display_name: agg
                    .display_name()
                    .cloned()
                    .unwrap_or_else(|| CellValue::from(key)),
                total,
            });
        }
    }

    ranked.sort_by(|a, b| {
        a.total
            .is_nan()
            .cmp(&b.total.is_nan())
            .then_with(|| b.total.total_cmp(&a.total))
            .then_with(|| a.key.cmp(&b.key))
    });

    Summary {
        total_quantity,
        unique_products,
        ranked,
    }
}

/// Write the summary sheet into the sink's current sheet.
pub fn write_summary<K: SpreadsheetSink + ?Sized>(sink: &mut K, summary: &Summary) {
    sink.append_row(vec![SUMMARY_TITLE.into()]);
    sink.append_row(vec![TOTAL_LABEL.into(), present_number(summary.total_quantity)]);
    sink.append_row(vec![UNIQUE_LABEL.into(), CellValue::Int(summary.unique_products as i64)]);
    sink.append_row(Vec::new());
    sink.append_row(vec![PRODUCT_LABEL.into(), TOTAL_LABEL.into()]);

    for entry in &summary.ranked {
        sink.append_row(vec![entry.display_name.clone(), present_number(entry.total)]);
    }

    // Omitted entirely when nothing was ranked.
    if let Some(best) = summary.best_selling() {
        sink.append_row(Vec::new());
        sink.append_row(vec![BEST_LABEL.into(), best.display_name.clone()]);
        sink.append_row(vec![BEST_AMOUNT_LABEL.into(), present_number(best.total)]);
    }

    for (col, width) in SUMMARY_WIDTHS.iter().enumerate() {
        sink.set_column_width(col, *width);
    }
}
