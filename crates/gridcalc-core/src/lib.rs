//! # gridcalc-core
//!
//! Core types for the gridcalc formula engine:
//! - [`CellAddress`] and [`CellRange`] - spreadsheet-style cell addressing
//! - [`CellValue`] - typed cell results (numbers, strings, booleans, the error sentinel)
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::CellAddress;
//!
//! let addr = CellAddress::parse("AA12").unwrap();
//! assert_eq!(addr.row, 11);
//! assert_eq!(addr.col, 26);
//! assert_eq!(addr.to_string(), "AA12");
//! ```

pub mod address;
pub mod error;
pub mod value;

pub use address::{CellAddress, CellRange};
pub use error::{Error, Result};
pub use value::{CellValue, ERROR_SENTINEL};

/// Maximum number of rows in a sheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a sheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
