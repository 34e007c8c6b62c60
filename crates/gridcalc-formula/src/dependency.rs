//! Dependency extraction and tracking for formula calculation chains

use ahash::{AHashMap, AHashSet};
use gridcalc_core::CellAddress;
use lazy_regex::regex;

/// Extract the cell addresses a formula references, in first-occurrence
/// order with duplicates removed
///
/// The scan is purely lexical: tokens of the shape `[A-Z]+[0-9]+` are taken
/// left to right, so a range like `A1:A10` reports its two endpoints and is
/// never expanded here. Malformed formulas do not fail; the scan returns
/// whatever well-formed tokens it finds (tokens outside the sheet bounds are
/// skipped).
///
/// # Example
/// ```rust
/// use gridcalc_formula::extract_dependencies;
///
/// let deps = extract_dependencies("=SUM(A1:A10)");
/// let names: Vec<String> = deps.iter().map(|a| a.to_string()).collect();
/// assert_eq!(names, ["A1", "A10"]);
/// ```
pub fn extract_dependencies(formula: &str) -> Vec<CellAddress> {
    let token_re = regex!(r"[A-Z]+[0-9]+");

    let mut seen = AHashSet::new();
    let mut deps = Vec::new();

    for token in token_re.find_iter(formula) {
        if let Ok(addr) = CellAddress::parse(token.as_str()) {
            if seen.insert(addr) {
                deps.push(addr);
            }
        }
    }

    deps
}

/// Dependency graph for formula cells
///
/// Tracks which cells depend on which other cells, enabling callers to order
/// recalculation after an edit. The engine itself never consults this; it is
/// a convenience for grids building recalculation chains from
/// [`extract_dependencies`] output.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Cell → cells that depend on it (dependents)
    dependents: AHashMap<CellAddress, AHashSet<CellAddress>>,
    /// Cell → cells it depends on (precedents)
    precedents: AHashMap<CellAddress, AHashSet<CellAddress>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cell's formula, replacing any previous dependencies
    pub fn set_formula(&mut self, cell: CellAddress, formula: &str) {
        self.clear_dependencies(cell);
        for precedent in extract_dependencies(formula) {
            self.add_dependency(precedent, cell);
        }
    }

    /// Add a dependency: dependent depends on precedent
    pub fn add_dependency(&mut self, precedent: CellAddress, dependent: CellAddress) {
        self.dependents
            .entry(precedent)
            .or_default()
            .insert(dependent);
        self.precedents
            .entry(dependent)
            .or_default()
            .insert(precedent);
    }

    /// Remove all dependencies for a cell
    pub fn clear_dependencies(&mut self, cell: CellAddress) {
        if let Some(precedents) = self.precedents.remove(&cell) {
            for precedent in precedents {
                if let Some(deps) = self.dependents.get_mut(&precedent) {
                    deps.remove(&cell);
                }
            }
        }

        if let Some(dependents) = self.dependents.remove(&cell) {
            for dependent in dependents {
                if let Some(precs) = self.precedents.get_mut(&dependent) {
                    precs.remove(&cell);
                }
            }
        }
    }

    /// Get cells that depend on the given cell
    pub fn get_dependents(&self, cell: CellAddress) -> impl Iterator<Item = CellAddress> + '_ {
        self.dependents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get cells that the given cell depends on
    pub fn get_precedents(&self, cell: CellAddress) -> impl Iterator<Item = CellAddress> + '_ {
        self.precedents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get all cells that need to be recalculated when the given cells change
    pub fn recalc_order(&self, changed: &[CellAddress]) -> Vec<CellAddress> {
        let mut result = Vec::new();
        let mut visited = AHashSet::new();
        let mut in_stack = AHashSet::new();

        for &cell in changed {
            self.topological_sort(cell, &mut result, &mut visited, &mut in_stack);
        }

        result
    }

    /// Topological sort helper (DFS)
    fn topological_sort(
        &self,
        cell: CellAddress,
        result: &mut Vec<CellAddress>,
        visited: &mut AHashSet<CellAddress>,
        in_stack: &mut AHashSet<CellAddress>,
    ) {
        if visited.contains(&cell) || in_stack.contains(&cell) {
            // Already ordered, or a cycle - cycles are reported separately
            return;
        }

        in_stack.insert(cell);

        if let Some(dependents) = self.dependents.get(&cell) {
            for &dependent in dependents {
                self.topological_sort(dependent, result, visited, in_stack);
            }
        }

        in_stack.remove(&cell);
        visited.insert(cell);
        result.push(cell);
    }

    /// Detect circular references involving a cell
    pub fn has_circular_reference(&self, cell: CellAddress) -> bool {
        let mut visited = AHashSet::new();
        let mut in_stack = AHashSet::new();
        self.detect_cycle(cell, &mut visited, &mut in_stack)
    }

    fn detect_cycle(
        &self,
        cell: CellAddress,
        visited: &mut AHashSet<CellAddress>,
        in_stack: &mut AHashSet<CellAddress>,
    ) -> bool {
        if in_stack.contains(&cell) {
            return true;
        }
        if visited.contains(&cell) {
            return false;
        }

        visited.insert(cell);
        in_stack.insert(cell);

        if let Some(precedents) = self.precedents.get(&cell) {
            for &precedent in precedents {
                if self.detect_cycle(precedent, visited, in_stack) {
                    return true;
                }
            }
        }

        in_stack.remove(&cell);
        false
    }

    /// Clear the entire graph
    pub fn clear(&mut self) {
        self.dependents.clear();
        self.precedents.clear();
    }
}
