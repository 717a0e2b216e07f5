// Header resolution: raw header text -> column roles.
//
// Headers are normalized (lower-cased, whitespace/underscore/hyphen deleted),
// passed through a fixed alias table, then matched against the numbered
// product-name / quantity patterns. A missing numeric suffix means group 1.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::cell::CellValue;
use crate::error::CleanError;

const ORDER_ID_KEY: &str = "orderid";
const QUANTITY_KEY: &str = "quantity";
const TOTAL_QUANTITY_KEY: &str = "totalquantity";

/// Known spellings, keyed by their normalized form.
const HEADER_ALIASES: &[(&str, &str)] = &[
    ("orderid", ORDER_ID_KEY),
    ("id", ORDER_ID_KEY),
    ("qty", QUANTITY_KEY),
    ("quantity", QUANTITY_KEY),
    ("totalquantity", TOTAL_QUANTITY_KEY),
    ("totalqty", TOTAL_QUANTITY_KEY),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", content = "group", rename_all = "snake_case")]
pub enum ColumnRole {
    OrderId,
    ProductName(u32),
    Quantity(u32),
    /// A total-quantity column in the input. Recognized so it is not mistaken
    /// for a quantity group; the output recomputes totals itself.
    TotalQuantity,
    Unrecognized,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderId => write!(f, "order id"),
            Self::ProductName(n) => write!(f, "product name #{n}"),
            Self::Quantity(n) => write!(f, "quantity #{n}"),
            Self::TotalQuantity => write!(f, "total quantity"),
            Self::Unrecognized => write!(f, "ignored"),
        }
    }
}

/// A numbered name/quantity pair. Either member may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnGroup {
    pub index: u32,
    pub name_col: Option<usize>,
    pub quantity_col: Option<usize>,
}

/// How one header cell was interpreted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedColumn {
    pub col: usize,
    pub raw: String,
    pub key: String,
    pub role: ColumnRole,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderMap {
    pub order_col: usize,
    /// Sorted ascending by group index.
    pub groups: Vec<ColumnGroup>,
    pub columns: Vec<ResolvedColumn>,
}

impl HeaderMap {
    pub fn role_of(&self, col: usize) -> ColumnRole {
        self.columns
            .get(col)
            .map(|c| c.role)
            .unwrap_or(ColumnRole::Unrecognized)
    }
}

fn product_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^productname([0-9]*)").expect("valid regex"))
}

fn quantity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:productquantity|quantity)([0-9]*)").expect("valid regex"))
}

/// Normalize header text to its lookup key. Idempotent.
pub fn normalize_header(name: &str) -> String {
    let key: String = name
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !(c.is_whitespace() || *c == '_' || *c == '-'))
        .collect();
    match HEADER_ALIASES.iter().find(|(alias, _)| *alias == key) {
        Some((_, canonical)) => (*canonical).to_string(),
        None => key,
    }
}

fn group_index(digits: &str) -> Option<u32> {
    if digits.is_empty() {
        Some(1)
    } else {
        digits.parse().ok()
    }
}

/// Resolve the role of a single normalized key.
pub fn classify_key(key: &str) -> ColumnRole {
    if key == ORDER_ID_KEY {
        return ColumnRole::OrderId;
    }
    if key == TOTAL_QUANTITY_KEY {
        return ColumnRole::TotalQuantity;
    }
    if let Some(caps) = product_name_re().captures(key) {
        if let Some(n) = group_index(&caps[1]) {
            return ColumnRole::ProductName(n);
        }
    }
    if let Some(caps) = quantity_re().captures(key) {
        if let Some(n) = group_index(&caps[1]) {
            return ColumnRole::Quantity(n);
        }
    }
    ColumnRole::Unrecognized
}

/// Map the header row to column roles.
///
/// Fails when no order-id column exists, or when no product-name/quantity
/// column exists at all. Unrecognized columns are ignored.
pub fn resolve_headers(header: &[CellValue]) -> Result<HeaderMap, CleanError> {
    let mut order_col = None;
    let mut groups: BTreeMap<u32, ColumnGroup> = BTreeMap::new();
    let mut columns = Vec::with_capacity(header.len());

    for (col, cell) in header.iter().enumerate() {
        let raw = cell.display();
        let key = normalize_header(&raw);
        let role = classify_key(&key);

        match role {
            ColumnRole::OrderId => {
                if let Some(prev) = order_col {
                    log::warn!("duplicate order id header at column {col} (previous {prev}); using the later one");
                }
                order_col = Some(col);
            }
            ColumnRole::ProductName(n) => {
                let group = groups.entry(n).or_insert_with(|| empty_group(n));
                group.name_col = Some(col);
            }
            ColumnRole::Quantity(n) => {
                let group = groups.entry(n).or_insert_with(|| empty_group(n));
                group.quantity_col = Some(col);
            }
            ColumnRole::TotalQuantity | ColumnRole::Unrecognized => {}
        }

        columns.push(ResolvedColumn { col, raw, key, role });
    }

    let order_col = order_col.ok_or(CleanError::MissingOrderIdColumn)?;
    if groups.is_empty() {
        return Err(CleanError::NoProductColumnsFound);
    }

    log::debug!(
        "resolved headers: order id at column {order_col}, {} column group(s)",
        groups.len()
    );

    Ok(HeaderMap {
        order_col,
        groups: groups.into_values().collect(),
        columns,
    })
}

fn empty_group(index: u32) -> ColumnGroup {
    ColumnGroup {
        index,
        name_col: None,
        quantity_col: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<CellValue> {
        names.iter().map(|n| CellValue::from(*n)).collect()
    }

    #[test]
    fn normalize_variants_collapse() {
        assert_eq!(normalize_header("Order ID"), "orderid");
        assert_eq!(normalize_header("ORDER_ID"), "orderid");
        assert_eq!(normalize_header("order-id"), "orderid");
        assert_eq!(normalize_header(" Id "), "orderid");
        assert_eq!(normalize_header("Qty"), "quantity");
        assert_eq!(normalize_header("Product  Name 2"), "productname2");
    }

    #[test]
    fn normalize_is_idempotent_on_aliases() {
        for raw in ["Order ID", "qty", "Total_Qty", "Product Name 3", "whatever"] {
            let once = normalize_header(raw);
            assert_eq!(normalize_header(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn classify_patterns() {
        assert_eq!(classify_key("productname"), ColumnRole::ProductName(1));
        assert_eq!(classify_key("productname12"), ColumnRole::ProductName(12));
        assert_eq!(classify_key("productquantity3"), ColumnRole::Quantity(3));
        assert_eq!(classify_key("quantity"), ColumnRole::Quantity(1));
        assert_eq!(classify_key("quantity2"), ColumnRole::Quantity(2));
        assert_eq!(classify_key("totalquantity"), ColumnRole::TotalQuantity);
        assert_eq!(classify_key("customer"), ColumnRole::Unrecognized);
    }

    #[test]
    fn prefix_match_tolerates_trailing_text() {
        // Only the start of the key is anchored.
        assert_eq!(classify_key("productnameen"), ColumnRole::ProductName(1));
        assert_eq!(classify_key("quantity2units"), ColumnRole::Quantity(2));
    }

    #[test]
    fn total_qty_is_not_a_quantity_group() {
        let map = resolve_headers(&headers(&["Order ID", "Total_Qty", "Product Name 2"])).unwrap();
        assert_eq!(map.role_of(1), ColumnRole::TotalQuantity);
        assert_eq!(map.role_of(2), ColumnRole::ProductName(2));
        assert_eq!(
            map.groups,
            vec![ColumnGroup { index: 2, name_col: Some(2), quantity_col: None }]
        );
    }

    #[test]
    fn groups_pair_by_index_and_sort() {
        let map = resolve_headers(&headers(&[
            "productName2",
            "productQuantity2",
            "id",
            "productName",
            "qty",
            "notes",
        ]))
        .unwrap();
        assert_eq!(map.order_col, 2);
        assert_eq!(map.groups.len(), 2);
        assert_eq!(map.groups[0], ColumnGroup { index: 1, name_col: Some(3), quantity_col: Some(4) });
        assert_eq!(map.groups[1], ColumnGroup { index: 2, name_col: Some(0), quantity_col: Some(1) });
        assert_eq!(map.role_of(5), ColumnRole::Unrecognized);
    }

    #[test]
    fn missing_order_id_fails() {
        let err = resolve_headers(&headers(&["product_name", "quantity"])).unwrap_err();
        assert_eq!(err, CleanError::MissingOrderIdColumn);
    }

    #[test]
    fn missing_product_columns_fails() {
        let err = resolve_headers(&headers(&["order_id", "customer"])).unwrap_err();
        assert_eq!(err, CleanError::NoProductColumnsFound);
    }

    #[test]
    fn order_id_checked_before_product_columns() {
        let err = resolve_headers(&headers(&["customer"])).unwrap_err();
        assert_eq!(err, CleanError::MissingOrderIdColumn);
    }

    #[test]
    fn later_duplicate_wins() {
        let map = resolve_headers(&headers(&["id", "order_id", "product_name", "Product Name"])).unwrap();
        assert_eq!(map.order_col, 1);
        assert_eq!(map.groups[0].name_col, Some(3));
    }

    #[test]
    fn numeric_and_empty_headers_are_ignored() {
        let map = resolve_headers(&[
            CellValue::Int(2024),
            CellValue::Empty,
            "order id".into(),
            "quantity".into(),
        ])
        .unwrap();
        assert_eq!(map.role_of(0), ColumnRole::Unrecognized);
        assert_eq!(map.role_of(1), ColumnRole::Unrecognized);
        assert_eq!(map.groups[0].quantity_col, Some(3));
        assert_eq!(map.groups[0].name_col, None);
    }
}
