//! Evaluation context: the caller-supplied cell store
//!
//! The engine never mutates a context and caches nothing across calls; each
//! `evaluate` invocation reads only the context it is handed, so contexts
//! can be shared across threads for parallel recalculation.

use ahash::AHashMap;
use gridcalc_core::{CellAddress, CellRange, CellValue, Result};

/// Read-only mapping from cell address to raw value
///
/// # Example
/// ```rust
/// use gridcalc_formula::EvaluationContext;
///
/// let mut ctx = EvaluationContext::new();
/// ctx.set("A1", 10).unwrap();
/// ctx.set("B2", "label").unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    cells: AHashMap<CellAddress, CellValue>,
}

impl EvaluationContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell value by A1-style address
    pub fn set(&mut self, address: &str, value: impl Into<CellValue>) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.cells.insert(addr, value.into());
        Ok(())
    }

    /// Set a cell value by row/column indices (0-based)
    pub fn set_at(&mut self, row: u32, col: u16, value: impl Into<CellValue>) {
        self.cells.insert(CellAddress::new(row, col), value.into());
    }

    /// Get the raw value of a cell, if present
    pub fn get(&self, addr: &CellAddress) -> Option<&CellValue> {
        self.cells.get(addr)
    }

    /// Get a cell's value coerced to a finite number
    ///
    /// Absent cells and values that do not coerce yield `None`.
    pub fn number_at(&self, addr: &CellAddress) -> Option<f64> {
        self.cells.get(addr).and_then(CellValue::as_number)
    }

    /// Expand a range to its numeric member values
    ///
    /// Iterates the rectangle in row-major ascending order and keeps only the
    /// cells that coerce to a finite number; non-numeric and absent cells are
    /// silently skipped, so the result may be shorter than the rectangle.
    pub fn expand_range(&self, range: &CellRange) -> Vec<f64> {
        range
            .cells()
            .filter_map(|addr| self.number_at(&addr))
            .collect()
    }

    /// Number of populated cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the context holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(CellAddress, CellValue)> for EvaluationContext {
    fn from_iter<T: IntoIterator<Item = (CellAddress, CellValue)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::CellRange;
    use pretty_assertions::assert_eq;

    fn sample() -> EvaluationContext {
        let mut ctx = EvaluationContext::new();
        ctx.set("A1", 10).unwrap();
        ctx.set("A2", 20).unwrap();
        ctx.set("B1", "30").unwrap(); // Numeric string counts
        ctx.set("B2", "label").unwrap(); // Skipped in ranges
        ctx
    }

    #[test]
    fn test_set_rejects_bad_address() {
        let mut ctx = EvaluationContext::new();
        assert!(ctx.set("a1", 1).is_err());
        assert!(ctx.set("11", 1).is_err());
    }

    #[test]
    fn test_number_at() {
        let ctx = sample();
        assert_eq!(ctx.number_at(&CellAddress::new(0, 0)), Some(10.0));
        assert_eq!(ctx.number_at(&CellAddress::new(0, 1)), Some(30.0));
        assert_eq!(ctx.number_at(&CellAddress::new(1, 1)), None); // "label"
        assert_eq!(ctx.number_at(&CellAddress::new(9, 9)), None); // Absent
    }

    #[test]
    fn test_expand_range_row_major() {
        let ctx = sample();
        let range = CellRange::parse("A1:B2").unwrap();
        // Row-major: A1, B1, A2; B2 is non-numeric and dropped
        assert_eq!(ctx.expand_range(&range), vec![10.0, 30.0, 20.0]);
    }

    #[test]
    fn test_expand_range_order_invariance() {
        let ctx = sample();
        let forward = CellRange::parse("A1:B2").unwrap();
        let backward = CellRange::parse("B2:A1").unwrap();
        assert_eq!(ctx.expand_range(&forward), ctx.expand_range(&backward));
    }

    #[test]
    fn test_expand_range_empty() {
        let ctx = sample();
        let range = CellRange::parse("Z1:Z10").unwrap();
        assert!(ctx.expand_range(&range).is_empty());
    }
}
