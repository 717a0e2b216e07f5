//! `sheetclean-engine`: order sheet cleaning core.
//!
//! Pure engine crate: reads a header + data grid through `SpreadsheetSource`,
//! writes the grouped "Cleaned" sheet and the "Summary" sheet through
//! `SpreadsheetSink`. No file format or UI dependencies.

pub mod aggregate;
pub mod cell;
pub mod error;
pub mod extract;
pub mod grouping;
pub mod header;
pub mod sheet;
pub mod source;
pub mod summary;
pub mod transform;
pub mod workbook;

pub use cell::CellValue;
pub use error::CleanError;
pub use source::{Grid, SpreadsheetSource};
pub use transform::{inspect, transform, transform_into, TransformOptions, TransformReport};
pub use workbook::{SpreadsheetSink, Workbook};
