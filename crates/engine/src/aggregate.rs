use std::collections::BTreeMap;

use crate::cell::{present_total, CellValue};
use crate::extract::ExtractedRecord;

/// Running state for one normalized product name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductAggregate {
    sum: f64,
    has_numeric: bool,
    display_name: Option<CellValue>,
    record_count: usize,
}

impl ProductAggregate {
    /// Fold one record in. Only numeric quantities move the total; the first
    /// display name seen is kept.
    pub fn absorb(&mut self, record: &ExtractedRecord) {
        if let Some(n) = record.quantity.numeric() {
            self.sum += n;
            self.has_numeric = true;
        }
        if self.display_name.is_none() {
            self.display_name = record.display_name.clone();
        }
        self.record_count += 1;
    }

    /// Combine with state accumulated later in the same pass.
    pub fn merge(&mut self, later: &ProductAggregate) {
        self.sum += later.sum;
        self.has_numeric |= later.has_numeric;
        if self.display_name.is_none() {
            self.display_name = later.display_name.clone();
        }
        self.record_count += later.record_count;
    }

    /// Total of numeric quantities, `None` when none was ever seen.
    pub fn total(&self) -> Option<f64> {
        self.has_numeric.then_some(self.sum)
    }

    /// Running sum regardless of whether any numeric value was seen (0.0 then).
    pub fn raw_sum(&self) -> f64 {
        self.sum
    }

    pub fn has_numeric(&self) -> bool {
        self.has_numeric
    }

    pub fn display_name(&self) -> Option<&CellValue> {
        self.display_name.as_ref()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }
}

/// Per-product totals keyed by normalized name, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductAggregator {
    products: BTreeMap<String, ProductAggregate>,
}

impl ProductAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[ExtractedRecord]) -> Self {
        let mut agg = Self::new();
        for record in records {
            agg.add(record);
        }
        agg
    }

    pub fn add(&mut self, record: &ExtractedRecord) {
        self.products
            .entry(record.product_key.clone())
            .or_default()
            .absorb(record);
    }

    /// Merge another aggregator whose records came after ours.
    pub fn merge(&mut self, later: &ProductAggregator) {
        for (key, agg) in &later.products {
            self.products.entry(key.clone()).or_default().merge(agg);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ProductAggregate> {
        self.products.get(key)
    }

    pub fn total_for(&self, key: &str) -> Option<f64> {
        self.products.get(key).and_then(ProductAggregate::total)
    }

    /// Total as written to output: integral values as integers, no value as empty.
    pub fn present_total_for(&self, key: &str) -> CellValue {
        present_total(self.total_for(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductAggregate)> {
        self.products.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Quantity;

    fn record(key: &str, name: Option<&str>, qty: Quantity, sequence: usize) -> ExtractedRecord {
        ExtractedRecord {
            product_key: key.into(),
            order_id: CellValue::Int(sequence as i64),
            display_name: name.map(CellValue::from),
            quantity: qty,
            sequence,
        }
    }

    #[test]
    fn sums_numeric_quantities() {
        let agg = ProductAggregator::from_records(&[
            record("widget", Some("Widget"), Quantity::Numeric(3.0), 0),
            record("widget", Some("widget"), Quantity::Numeric(2.0), 1),
        ]);
        assert_eq!(agg.total_for("widget"), Some(5.0));
        assert_eq!(agg.present_total_for("widget"), CellValue::Int(5));
        assert_eq!(agg.get("widget").unwrap().record_count(), 2);
    }

    #[test]
    fn no_numeric_means_no_value() {
        let agg = ProductAggregator::from_records(&[record(
            "gadget",
            Some("Gadget"),
            Quantity::Raw(CellValue::Empty),
            0,
        )]);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.total_for("gadget"), None);
        assert_eq!(agg.present_total_for("gadget"), CellValue::Empty);
        assert_eq!(agg.get("gadget").unwrap().raw_sum(), 0.0);
    }

    #[test]
    fn non_numeric_does_not_disturb_total() {
        let agg = ProductAggregator::from_records(&[
            record("widget", Some("Widget"), Quantity::Numeric(1.5), 0),
            record("widget", Some("Widget"), Quantity::Raw("n/a".into()), 1),
        ]);
        assert_eq!(agg.total_for("widget"), Some(1.5));
        assert_eq!(agg.present_total_for("widget"), CellValue::Number(1.5));
    }

    #[test]
    fn first_display_name_wins() {
        let agg = ProductAggregator::from_records(&[
            record("widget", None, Quantity::Numeric(1.0), 0),
            record("widget", Some("Widget"), Quantity::Numeric(1.0), 1),
            record("widget", Some("WIDGET"), Quantity::Numeric(1.0), 2),
        ]);
        assert_eq!(agg.get("widget").unwrap().display_name(), Some(&CellValue::from("Widget")));
    }

    #[test]
    fn merge_matches_single_pass() {
        let records = vec![
            record("widget", Some("Widget"), Quantity::Numeric(3.0), 0),
            record("gadget", Some("Gadget"), Quantity::Raw(CellValue::Empty), 1),
            record("widget", Some("WIDGET"), Quantity::Numeric(2.0), 2),
            record("gadget", Some("GADGET"), Quantity::Numeric(4.0), 3),
        ];
        let whole = ProductAggregator::from_records(&records);

        let mut first = ProductAggregator::from_records(&records[..2]);
        let second = ProductAggregator::from_records(&records[2..]);
        first.merge(&second);

        assert_eq!(first, whole);
        assert_eq!(first.get("gadget").unwrap().display_name(), Some(&CellValue::from("Gadget")));
        assert_eq!(first.total_for("gadget"), Some(4.0));
    }
}
