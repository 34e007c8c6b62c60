//! Cell value types

use std::fmt;

/// The in-band error marker stored and displayed in place of a result
///
/// Evaluation never raises; every failure collapses to this sentinel so a
/// grid can store the engine's output directly as displayable cell content.
pub const ERROR_SENTINEL: &str = "#ERROR!";

/// A typed cell value: the engine's input (via the evaluation context) and
/// its output
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Numeric value (all numbers stored as f64)
    Number(f64),

    /// String value
    String(String),

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// The error sentinel ("#ERROR!")
    Error,
}

impl CellValue {
    /// Try to coerce the value to a finite number
    ///
    /// Strings parse leniently (surrounding whitespace ignored); anything
    /// that does not yield a finite f64 is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Boolean(true) => Some(1.0),
            CellValue::Boolean(false) => Some(0.0),
            _ => None,
        }
    }

    /// Check if this is the error sentinel
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error)
    }

    /// Get the type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
            CellValue::Boolean(_) => "boolean",
            CellValue::Error => "error",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => {
                // No trailing ".0" for integral values
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Error => write!(f, "{}", ERROR_SENTINEL),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_number() {
        assert_eq!(CellValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(CellValue::String("42".into()).as_number(), Some(42.0));
        assert_eq!(CellValue::String(" 3.5 ".into()).as_number(), Some(3.5));
        assert_eq!(CellValue::String("abc".into()).as_number(), None);
        assert_eq!(CellValue::Boolean(true).as_number(), Some(1.0));
        assert_eq!(CellValue::Boolean(false).as_number(), Some(0.0));
        assert_eq!(CellValue::Error.as_number(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_number(), None);
        assert_eq!(CellValue::String("inf".into()).as_number(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(5.0).to_string(), "5");
        assert_eq!(CellValue::Number(3.14).to_string(), "3.14");
        assert_eq!(CellValue::Number(-2.0).to_string(), "-2");
        assert_eq!(CellValue::String("hi".into()).to_string(), "hi");
        assert_eq!(CellValue::Boolean(true).to_string(), "TRUE");
        assert_eq!(CellValue::Error.to_string(), "#ERROR!");
    }
}
