//! Connected component of the conjecture in the formula <-> symbol graph

use crate::error::{FilterError, FilterResult};
use crate::index::{FormulaId, SymbolIndex};
use hashbrown::HashSet;

/// Formulas reachable from `seed` through shared symbols, `seed` included.
pub fn reachable_from(index: &SymbolIndex, seed: FormulaId) -> HashSet<FormulaId> {
    let mut visited = HashSet::new();
    let mut to_visit = vec![seed];
    visited.insert(seed);

    while let Some(visiting) = to_visit.pop() {
        for symbol in index.symbols_of(visiting) {
            for formula in index.formulas_of(symbol) {
                if visited.insert(formula) {
                    to_visit.push(formula);
                }
            }
        }
    }

    visited
}

/// Formulas reachable from the last of `num_formulas` formulas.
///
/// The last formula is the conjecture. Asking for the component of an empty
/// sequence is a contract violation.
pub fn reachable_from_conjecture(
    index: &SymbolIndex,
    num_formulas: usize,
) -> FilterResult<HashSet<FormulaId>> {
    let last = num_formulas.checked_sub(1).ok_or(FilterError::EmptyInput)?;
    Ok(reachable_from(index, FormulaId(last as u32)))
}
