// End-to-end tests: grid in, Cleaned + Summary sheets out.
// Run with: cargo test -p sheetclean-engine --test pipeline

use sheetclean_engine::header::{resolve_headers, ColumnRole};
use sheetclean_engine::sheet::Sheet;
use sheetclean_engine::{transform, CellValue, CleanError, Grid, TransformOptions, Workbook};

fn text(s: &str) -> CellValue {
    CellValue::from(s)
}

fn run(grid: &Grid) -> (Workbook, sheetclean_engine::TransformReport) {
    transform(grid, &TransformOptions::default()).unwrap()
}

fn cleaned(wb: &Workbook) -> &Sheet {
    wb.sheet("Cleaned").expect("Cleaned sheet")
}

fn summary(wb: &Workbook) -> &Sheet {
    wb.sheet("Summary").expect("Summary sheet")
}

fn simple_header() -> Vec<CellValue> {
    vec![text("Order ID"), text("Product Name"), text("Quantity")]
}

// -------------------------------------------------------------------------
// Scenario A: case-variant names group together, missing quantity = no value
// -------------------------------------------------------------------------

#[test]
fn widget_rows_merge_and_gadget_has_no_value() {
    let grid = Grid::with_header(
        simple_header(),
        vec![
            vec![CellValue::Int(1), text("Widget"), CellValue::Int(3)],
            vec![CellValue::Int(2), text("widget"), CellValue::Int(2)],
            vec![CellValue::Int(3), text("Gadget"), CellValue::Empty],
        ],
    );
    let (wb, report) = run(&grid);
    let sheet = cleaned(&wb);

    assert_eq!(sheet.row_count(), 4);
    // gadget < widget
    assert_eq!(sheet.get(1, 0), Some(&CellValue::Int(3)));
    assert_eq!(sheet.get(1, 1), Some(&text("Gadget")));
    assert_eq!(sheet.get(1, 3), Some(&CellValue::Empty));

    assert_eq!(sheet.get(2, 0), Some(&CellValue::Int(1)));
    assert_eq!(sheet.get(3, 0), Some(&CellValue::Int(2)));
    assert_eq!(sheet.get(3, 1), Some(&text("widget")));
    assert_eq!(sheet.get(2, 3), Some(&CellValue::Int(5)));
    assert_eq!(sheet.get(3, 3), Some(&CellValue::Empty));

    assert_eq!(sheet.merged_regions.len(), 1);
    assert_eq!(sheet.merged_regions[0].start, (2, 3));
    assert_eq!(sheet.merged_regions[0].end, (3, 3));

    let ranked = &report.summary.ranked;
    assert_eq!(ranked.len(), 1, "gadget has no numeric value and is not ranked");
    assert_eq!(ranked[0].display_name, text("Widget"));
    assert_eq!(ranked[0].total, 5.0);
    assert_eq!(report.summary.unique_products, 2);

    let s = summary(&wb);
    assert_eq!(s.get(5, 0), Some(&text("Widget")));
    assert_eq!(s.get(5, 1), Some(&CellValue::Int(5)));
    assert_eq!(s.get(7, 1), Some(&text("Widget")));
}

// -------------------------------------------------------------------------
// Scenario B: order id present but every group empty -> no records
// -------------------------------------------------------------------------

#[test]
fn row_with_only_order_id_is_excluded() {
    let grid = Grid::with_header(
        vec![
            text("order_id"),
            text("productName"),
            text("productQuantity"),
            text("productName2"),
            text("productQuantity2"),
        ],
        vec![
            vec![text("A-1"), CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Empty],
            vec![text("A-2"), text("Bolt"), CellValue::Int(4)],
        ],
    );
    let (wb, report) = run(&grid);
    assert_eq!(report.records, 1);
    assert_eq!(cleaned(&wb).row_count(), 2);
    assert_eq!(cleaned(&wb).get(1, 0), Some(&text("A-2")));
}

// -------------------------------------------------------------------------
// Scenario C: header aliases
// -------------------------------------------------------------------------

#[test]
fn total_qty_and_numbered_name_resolve() {
    let map = resolve_headers(&[text("ID"), text("Total_Qty"), text("Product Name 2")]).unwrap();
    assert_eq!(map.role_of(1), ColumnRole::TotalQuantity);
    assert_eq!(map.role_of(2), ColumnRole::ProductName(2));
}

#[test]
fn input_total_column_is_ignored() {
    let grid = Grid::with_header(
        vec![text("id"), text("product_name"), text("qty"), text("Total Quantity")],
        vec![vec![CellValue::Int(1), text("Nut"), CellValue::Int(2), CellValue::Int(999)]],
    );
    let (wb, _) = run(&grid);
    assert_eq!(cleaned(&wb).get(1, 3), Some(&CellValue::Int(2)));
}

// -------------------------------------------------------------------------
// Edge cases
// -------------------------------------------------------------------------

#[test]
fn header_only_input() {
    let (wb, report) = run(&Grid::with_header(simple_header(), Vec::new()));
    assert_eq!(cleaned(&wb).row_count(), 1);
    assert!(cleaned(&wb).merged_regions.is_empty());
    assert!(report.summary.ranked.is_empty());
    // title, total, unique, blank, column header
    assert_eq!(summary(&wb).row_count(), 5);
}

#[test]
fn fatal_header_errors() {
    let no_id = Grid::with_header(vec![text("product_name")], Vec::new());
    assert_eq!(
        transform(&no_id, &TransformOptions::default()).unwrap_err(),
        CleanError::MissingOrderIdColumn
    );

    let no_products = Grid::with_header(vec![text("order id"), text("customer")], Vec::new());
    assert_eq!(
        transform(&no_products, &TransformOptions::default()).unwrap_err(),
        CleanError::NoProductColumnsFound
    );

    assert_eq!(
        transform(&Grid::default(), &TransformOptions::default()).unwrap_err(),
        CleanError::MissingOrderIdColumn
    );
}

#[test]
fn nameless_quantities_sort_last_under_one_run() {
    let grid = Grid::with_header(
        simple_header(),
        vec![
            vec![CellValue::Int(1), CellValue::Empty, CellValue::Int(2)],
            vec![CellValue::Int(2), text("Anvil"), CellValue::Int(1)],
            vec![CellValue::Int(3), CellValue::Empty, CellValue::Int(5)],
        ],
    );
    let (wb, report) = run(&grid);
    let sheet = cleaned(&wb);
    assert_eq!(sheet.get(1, 1), Some(&text("Anvil")));
    assert_eq!(sheet.get(2, 3), Some(&CellValue::Int(7)));
    assert_eq!(sheet.merged_regions.len(), 1);
    assert_eq!(report.summary.total_quantity, 8.0);
    assert_eq!(report.summary.ranked.len(), 1);
}

#[test]
fn fractional_totals_stay_fractional() {
    let grid = Grid::with_header(
        simple_header(),
        vec![
            vec![CellValue::Int(1), text("Rope"), text("1.25")],
            vec![CellValue::Int(2), text("Rope"), text("0.5")],
        ],
    );
    let (wb, _) = run(&grid);
    assert_eq!(cleaned(&wb).get(1, 2), Some(&CellValue::Number(1.25)));
    assert_eq!(cleaned(&wb).get(1, 3), Some(&CellValue::Number(1.75)));
}

#[test]
fn nan_text_quantity_is_not_a_best_seller() {
    let grid = Grid::with_header(
        simple_header(),
        vec![
            vec![CellValue::Int(1), text("Ghost"), text("nan")],
            vec![CellValue::Int(2), text("Widget"), CellValue::Int(2)],
        ],
    );
    let (wb, report) = run(&grid);
    assert_eq!(report.non_numeric_quantities, 1);
    assert_eq!(report.summary.ranked.len(), 1);
    assert_eq!(report.summary.total_quantity, 2.0);

    // ghost sorts first, quantity passed through, no total
    let sheet = cleaned(&wb);
    assert_eq!(sheet.get(1, 2), Some(&text("nan")));
    assert!(matches!(sheet.get(1, 3), None | Some(CellValue::Empty)));

    let sheet = summary(&wb);
    assert_eq!(sheet.get(5, 0), Some(&text("Widget")));
    assert_eq!(sheet.get(7, 1), Some(&text("Widget")));
    assert_eq!(sheet.get(8, 1), Some(&CellValue::Int(2)));
}

#[test]
fn output_is_deterministic() {
    let grid = Grid::with_header(
        simple_header(),
        vec![
            vec![text("b"), text("X"), CellValue::Int(1)],
            vec![text("a"), text("Y"), CellValue::Int(1)],
            vec![text("c"), text("x"), text("oops")],
        ],
    );
    let (first, r1) = run(&grid);
    let (second, r2) = run(&grid);
    assert_eq!(r1, r2);
    assert_eq!(cleaned(&first).rows(), cleaned(&second).rows());
    assert_eq!(summary(&first).rows(), summary(&second).rows());
}
