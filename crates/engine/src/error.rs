use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    /// The input path does not exist.
    InputNotFound(String),
    /// The input exists but could not be opened or parsed as a grid.
    InputUnreadable(String),
    /// No header resolved to the order-id role.
    MissingOrderIdColumn,
    /// No header resolved to a product-name or quantity role.
    NoProductColumnsFound,
    /// Writing the output artifact failed.
    Output(String),
}

impl fmt::Display for CleanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound(path) => write!(f, "File not found: {path}"),
            Self::InputUnreadable(msg) => write!(f, "cannot read input: {msg}"),
            Self::MissingOrderIdColumn => write!(f, "Missing required column: id / order_id"),
            Self::NoProductColumnsFound => {
                write!(f, "No productName / productQuantity columns found.")
            }
            Self::Output(msg) => write!(f, "cannot write output: {msg}"),
        }
    }
}

impl std::error::Error for CleanError {}
