// Row extraction: one logical record per (row, column group).

use crate::cell::{present_number, CellValue};
use crate::header::HeaderMap;

/// Quantity as read from a record's quantity cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    Numeric(f64),
    /// Non-numeric or absent; carried through for display only.
    Raw(CellValue),
}

impl Quantity {
    pub fn from_cell(cell: &CellValue) -> Self {
        match cell.to_number() {
            Some(n) => Quantity::Numeric(n),
            None => Quantity::Raw(cell.clone()),
        }
    }

    pub fn numeric(&self) -> Option<f64> {
        match self {
            Quantity::Numeric(n) => Some(*n),
            Quantity::Raw(_) => None,
        }
    }

    /// Value written to the per-row quantity column.
    pub fn display(&self) -> CellValue {
        match self {
            Quantity::Numeric(n) => present_number(*n),
            Quantity::Raw(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRecord {
    /// Normalized product name; empty when the row has no name.
    pub product_key: String,
    pub order_id: CellValue,
    pub display_name: Option<CellValue>,
    pub quantity: Quantity,
    /// Discovery order across the whole pass.
    pub sequence: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractStats {
    pub rows_read: usize,
    pub rows_without_order_id: usize,
    pub empty_groups: usize,
    pub non_numeric_quantities: usize,
}

/// Lower-case, trim and collapse internal whitespace runs to one space.
pub fn normalize_product_name(name: &CellValue) -> String {
    name.display()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell_at(row: &[CellValue], col: Option<usize>) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    col.and_then(|c| row.get(c)).unwrap_or(&EMPTY)
}

/// Walk data rows and emit records in discovery order.
///
/// Rows with a blank order id are skipped. Within a row, a group whose name
/// and quantity cells are both blank yields nothing.
pub fn extract_records<I>(headers: &HeaderMap, rows: I) -> (Vec<ExtractedRecord>, ExtractStats)
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let mut records = Vec::new();
    let mut stats = ExtractStats::default();

    for row in rows {
        stats.rows_read += 1;

        let order_id = cell_at(&row, Some(headers.order_col));
        if order_id.is_blank() {
            stats.rows_without_order_id += 1;
            continue;
        }

        for group in &headers.groups {
            let name = cell_at(&row, group.name_col);
            let qty = cell_at(&row, group.quantity_col);
            if name.is_blank() && qty.is_blank() {
                stats.empty_groups += 1;
                continue;
            }

            let quantity = Quantity::from_cell(qty);
            if quantity.numeric().is_none() {
                stats.non_numeric_quantities += 1;
            }

            records.push(ExtractedRecord {
                product_key: normalize_product_name(name),
                order_id: order_id.clone(),
                display_name: (!name.is_blank()).then(|| name.clone()),
                quantity,
                sequence: records.len(),
            });
        }
    }

    log::debug!(
        "extracted {} record(s) from {} row(s), {} without order id",
        records.len(),
        stats.rows_read,
        stats.rows_without_order_id
    );

    (records, stats)
}
