//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | General error (unspecified)               |
//! | 2    | CLI usage error (bad args)                |
//! | 3    | Input file not found                      |
//! | 4    | Input file could not be read              |
//! | 5    | No order id column in the header row      |
//! | 6    | No product name / quantity columns        |
//! | 7    | Output could not be written               |

use sheetclean_engine::CleanError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input path does not exist.
pub const EXIT_INPUT_NOT_FOUND: u8 = 3;

/// Input exists but is not a readable spreadsheet/CSV.
pub const EXIT_INPUT_UNREADABLE: u8 = 4;

/// Header row has no id / order_id column.
pub const EXIT_MISSING_ORDER_ID: u8 = 5;

/// Header row has no productName / quantity columns.
pub const EXIT_NO_PRODUCT_COLUMNS: u8 = 6;

/// Writing the output file (or JSON report) failed.
pub const EXIT_OUTPUT: u8 = 7;

/// Map an engine error to its exit code.
pub fn clean_exit_code(err: &CleanError) -> u8 {
    match err {
        CleanError::InputNotFound(_) => EXIT_INPUT_NOT_FOUND,
        CleanError::InputUnreadable(_) => EXIT_INPUT_UNREADABLE,
        CleanError::MissingOrderIdColumn => EXIT_MISSING_ORDER_ID,
        CleanError::NoProductColumnsFound => EXIT_NO_PRODUCT_COLUMNS,
        CleanError::Output(_) => EXIT_OUTPUT,
    }
}
