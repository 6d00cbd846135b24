//! Bidirectional formula <-> symbol index
//!
//! Relevance is tracked per top-level formula, never per sub-term: every
//! symbol discovered anywhere inside a formula's activated sub-terms is
//! filed under that formula's position.

use hashbrown::{HashMap, HashSet};
use sine_core::FuncId;
use std::fmt;

/// Position of a top-level formula in the goal being filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormulaId(pub u32);

impl FormulaId {
    /// Position in the original formula sequence.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Formula -> symbols it depends on, and symbol -> formulas depending on it.
///
/// Entries are append-only for the lifetime of one filtering run.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    formula_symbols: HashMap<FormulaId, HashSet<FuncId>>,
    symbol_formulas: HashMap<FuncId, HashSet<FormulaId>>,
}

impl SymbolIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `formula` has an entry, even if it never mentions a symbol.
    pub fn ensure_formula(&mut self, formula: FormulaId) {
        self.formula_symbols.entry(formula).or_default();
    }

    /// Record that `formula` depends on `symbol`. Duplicates are ignored.
    pub fn insert(&mut self, formula: FormulaId, symbol: FuncId) {
        self.formula_symbols
            .entry(formula)
            .or_default()
            .insert(symbol);
        self.symbol_formulas
            .entry(symbol)
            .or_default()
            .insert(formula);
    }

    /// Symbols recorded for `formula`, in unspecified order.
    pub fn symbols_of(&self, formula: FormulaId) -> impl Iterator<Item = FuncId> + '_ {
        self.formula_symbols
            .get(&formula)
            .into_iter()
            .flatten()
            .copied()
    }

    /// Formulas recorded as depending on `symbol`, in unspecified order.
    pub fn formulas_of(&self, symbol: FuncId) -> impl Iterator<Item = FormulaId> + '_ {
        self.symbol_formulas
            .get(&symbol)
            .into_iter()
            .flatten()
            .copied()
    }

    /// Returns true if `formula` is recorded as depending on `symbol`.
    #[must_use]
    pub fn depends_on(&self, formula: FormulaId, symbol: FuncId) -> bool {
        self.formula_symbols
            .get(&formula)
            .is_some_and(|symbols| symbols.contains(&symbol))
    }

    /// Returns true if `formula` has been seen by the index builder.
    #[must_use]
    pub fn contains_formula(&self, formula: FormulaId) -> bool {
        self.formula_symbols.contains_key(&formula)
    }

    /// Number of formulas with an entry.
    #[must_use]
    pub fn num_formulas(&self) -> usize {
        self.formula_symbols.len()
    }

    /// Number of symbols referenced by at least one formula.
    #[must_use]
    pub fn num_symbols(&self) -> usize {
        self.symbol_formulas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_bidirectional_and_idempotent() {
        let mut index = SymbolIndex::new();
        index.insert(FormulaId(0), FuncId(7));
        index.insert(FormulaId(0), FuncId(7));
        index.insert(FormulaId(1), FuncId(7));

        assert_eq!(index.symbols_of(FormulaId(0)).count(), 1);
        assert!(index.depends_on(FormulaId(1), FuncId(7)));
        assert!(!index.depends_on(FormulaId(2), FuncId(7)));
        assert_eq!(index.formulas_of(FuncId(7)).count(), 2);
        assert_eq!(index.num_symbols(), 1);
    }

    #[test]
    fn test_ensure_formula_creates_empty_entry() {
        let mut index = SymbolIndex::new();
        assert!(!index.contains_formula(FormulaId(3)));
        index.ensure_formula(FormulaId(3));
        assert!(index.contains_formula(FormulaId(3)));
        assert_eq!(index.symbols_of(FormulaId(3)).count(), 0);
        assert_eq!(index.num_formulas(), 1);
    }

    #[test]
    fn test_missing_entries_read_as_empty() {
        let index = SymbolIndex::new();
        assert_eq!(index.symbols_of(FormulaId(0)).count(), 0);
        assert_eq!(index.formulas_of(FuncId(0)).count(), 0);
    }
}
