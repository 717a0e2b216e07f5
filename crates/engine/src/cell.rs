use std::fmt;

use serde::{Serialize, Serializer};

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single cell value as read from a source grid or written to a sink.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Best-effort numeric coercion.
    ///
    /// Numbers pass through, booleans become 1/0, text is trimmed and parsed as
    /// a float. Anything else is non-numeric.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Empty => None,
            CellValue::Int(n) => Some(*n as f64),
            CellValue::Number(n) => Some(*n),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                // "nan" / "inf" parse as f64 but are not quantities
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    /// String form used for sorting, product-name keys and column sizing.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Number(n) => format_float(*n),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

// Reports carry cell values as plain JSON scalars, null for empty.
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Int(n) => serializer.serialize_i64(*n),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// Presentation rule for every computed number that reaches output:
/// integral values display as integers, everything else unchanged.
pub fn present_number(x: f64) -> CellValue {
    if x.is_finite() && x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER {
        CellValue::Int(x as i64)
    } else {
        CellValue::Number(x)
    }
}

/// Present an optional total; `None` ("no value") stays empty, never zero.
pub fn present_total(total: Option<f64>) -> CellValue {
    total.map(present_number).unwrap_or(CellValue::Empty)
}

fn format_float(n: f64) -> String {
    // Format nicely: integers without decimals
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
