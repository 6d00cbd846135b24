//! Trigger-pattern gating of quantified sub-formulas
//!
//! A universally quantified sub-formula with trigger patterns only becomes
//! relevant once one of its patterns mentions nothing but symbols that have
//! already been discovered. Until then it is parked under the first missing
//! symbol of each pattern and revisited when that symbol shows up.

use crate::error::{FilterError, FilterResult};
use crate::index::FormulaId;
use hashbrown::{HashMap, HashSet};
use sine_core::{FuncId, Quantifier, Symbol, TermData, TermId, TermStore};

/// A sub-term waiting to be walked, tagged with the top-level formula that
/// owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkItem {
    /// Sub-term to process
    pub term: TermId,
    /// Top-level formula the sub-term belongs to
    pub owner: FormulaId,
}

impl WorkItem {
    /// Pair `term` with its owning formula.
    #[must_use]
    pub fn new(term: TermId, owner: FormulaId) -> Self {
        WorkItem { term, owner }
    }
}

/// Outcome of checking a quantifier's patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The body may be walked now.
    Open,
    /// No pattern matched; the listed symbols (first missing symbol of each
    /// pattern, in pattern order) block activation. Empty when every pattern
    /// hit an interpreted operator or a literal.
    Blocked(Vec<FuncId>),
}

/// Decide whether the body of `q` (the quantifier node `quant`) is eligible.
///
/// Existential quantifiers and universals without patterns are always
/// open. Otherwise each pattern is scanned depth-first and the scan of a
/// pattern stops at the first term that is not an application of a
/// discovered symbol. An undiscovered symbol is reported as the blocker for
/// the pattern. An interpreted operator or a literal can never be
/// discovered, so a pattern reaching one fails without a blocker and the
/// quantifier cannot be woken through it.
pub fn check_patterns(
    terms: &TermStore,
    quant: TermId,
    q: &Quantifier,
    discovered: &HashSet<FuncId>,
) -> FilterResult<GateDecision> {
    if q.is_exists() || !q.has_patterns() {
        return Ok(GateDecision::Open);
    }

    let mut blockers = Vec::new();
    let mut stack: Vec<TermId> = Vec::new();
    let mut visited: HashSet<TermId> = HashSet::new();
    for &pattern in &q.patterns {
        let Some(TermData::Pattern(pattern_terms)) = terms.try_get(pattern) else {
            return Err(FilterError::MalformedPattern {
                quantifier: quant,
                pattern,
            });
        };

        stack.clear();
        visited.clear();
        stack.extend(pattern_terms.iter().copied());
        let mut scan = PatternScan::Matched;
        while let Some(curr) = stack.pop() {
            if !visited.insert(curr) {
                continue;
            }
            match terms.try_get(curr).ok_or(FilterError::UnknownTerm(curr))? {
                TermData::App(Symbol::Func(f), args) => {
                    if !discovered.contains(f) {
                        scan = PatternScan::Missing(*f);
                        break;
                    }
                    stack.extend(args.iter().copied());
                }
                TermData::App(Symbol::Builtin(_), _) | TermData::Const(_) => {
                    scan = PatternScan::Unmatchable;
                    break;
                }
                TermData::Var(..) | TermData::Quant(_) | TermData::Pattern(_) => {}
            }
        }

        match scan {
            PatternScan::Matched => return Ok(GateDecision::Open),
            PatternScan::Missing(f) => blockers.push(f),
            PatternScan::Unmatchable => {}
        }
    }

    Ok(GateDecision::Blocked(blockers))
}

enum PatternScan {
    Matched,
    Missing(FuncId),
    Unmatchable,
}

/// Quantifier work items parked until a symbol is discovered.
#[derive(Debug, Clone, Default)]
pub struct PendingQuantifiers {
    waiting: HashMap<FuncId, Vec<WorkItem>>,
    registered: HashSet<(FuncId, WorkItem)>,
}

impl PendingQuantifiers {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `item` until `symbol` is discovered. Returns false if it was
    /// already parked under that symbol.
    pub fn defer(&mut self, symbol: FuncId, item: WorkItem) -> bool {
        if !self.registered.insert((symbol, item)) {
            return false;
        }
        self.waiting.entry(symbol).or_default().push(item);
        true
    }

    /// Remove and return everything parked under `symbol`, in the order it
    /// was parked.
    pub fn take(&mut self, symbol: FuncId) -> Vec<WorkItem> {
        let items = self.waiting.remove(&symbol).unwrap_or_default();
        for item in &items {
            self.registered.remove(&(symbol, *item));
        }
        items
    }

    /// Number of symbols with parked items.
    #[must_use]
    pub fn num_blocking_symbols(&self) -> usize {
        self.waiting.len()
    }

    /// Returns true if nothing is parked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
