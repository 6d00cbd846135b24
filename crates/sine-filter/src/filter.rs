//! Sine Qua Non premise selection
//!
//! The filter runs in two phases over one sequence of top-level formulas:
//!
//! 1. A worklist walk discovers which uninterpreted symbols each formula
//!    depends on. Quantified sub-formulas with trigger patterns are only
//!    walked once a pattern is supported by symbols discovered so far (see
//!    [`crate::gate`]); otherwise they are parked and re-enqueued when the
//!    blocking symbol is discovered.
//! 2. The formulas connected to the last formula (the conjecture) through
//!    shared symbols are kept, in their original order.
//!
//! All mutable state lives in a [`FilterState`] created per call, so
//! separate runs never share anything but the read-only [`TermStore`].

use crate::error::{FilterError, FilterResult};
use crate::gate::{check_patterns, GateDecision, PendingQuantifiers, WorkItem};
use crate::index::{FormulaId, SymbolIndex};
use crate::reach::reachable_from_conjecture;
use hashbrown::HashSet;
use sine_core::{FuncId, Symbol, TermData, TermId, TermStore};
use std::fmt;
use tracing::{debug, trace};

/// Counters collected during one filtering run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Formulas handed to the filter
    pub formulas_in: usize,
    /// Formulas retained
    pub formulas_out: usize,
    /// Distinct uninterpreted symbols discovered
    pub symbols_discovered: usize,
    /// Distinct work items walked by the index builder
    pub items_processed: usize,
    /// Times a quantifier was parked because no pattern matched
    pub quantifiers_deferred: usize,
    /// Parked quantifiers re-enqueued after a discovery
    pub quantifiers_reactivated: usize,
}

impl FilterStats {
    /// Formulas dropped by the filter.
    #[must_use]
    pub fn formulas_dropped(&self) -> usize {
        self.formulas_in - self.formulas_out
    }
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(:sine-formulas-in {})", self.formulas_in)?;
        writeln!(f, "(:sine-formulas-out {})", self.formulas_out)?;
        writeln!(f, "(:sine-symbols {})", self.symbols_discovered)?;
        writeln!(f, "(:sine-items {})", self.items_processed)?;
        writeln!(f, "(:sine-deferred {})", self.quantifiers_deferred)?;
        write!(f, "(:sine-reactivated {})", self.quantifiers_reactivated)
    }
}

/// Per-run state of the index builder.
pub struct FilterState<'a> {
    terms: &'a TermStore,
    index: SymbolIndex,
    discovered: HashSet<FuncId>,
    pending: PendingQuantifiers,
    stack: Vec<WorkItem>,
    walked: HashSet<WorkItem>,
    stats: FilterStats,
}

impl<'a> FilterState<'a> {
    /// Fresh state over `terms`.
    #[must_use]
    pub fn new(terms: &'a TermStore) -> Self {
        FilterState {
            terms,
            index: SymbolIndex::new(),
            discovered: HashSet::new(),
            pending: PendingQuantifiers::new(),
            stack: Vec::new(),
            walked: HashSet::new(),
            stats: FilterStats::default(),
        }
    }

    /// Walk every formula until the worklist drains.
    ///
    /// Formulas are pushed in order and popped from the back, so the
    /// conjecture is the first formula walked.
    pub fn run(&mut self, formulas: &[TermId]) -> FilterResult<()> {
        self.stats.formulas_in += formulas.len();
        for (i, &form) in formulas.iter().enumerate() {
            self.stack.push(WorkItem::new(form, FormulaId(i as u32)));
        }

        while let Some(item) = self.stack.pop() {
            self.process(item)?;
        }

        self.stats.symbols_discovered = self.discovered.len();
        Ok(())
    }

    fn process(&mut self, item: WorkItem) -> FilterResult<()> {
        self.index.ensure_formula(item.owner);
        let terms = self.terms;
        let data = terms
            .try_get(item.term)
            .ok_or(FilterError::UnknownTerm(item.term))?;

        // A quantifier's gate result depends on what has been discovered, so
        // only non-quantifier items are walked at most once per owner.
        if !matches!(data, TermData::Quant(_)) && !self.walked.insert(item) {
            return Ok(());
        }
        self.stats.items_processed += 1;

        match data {
            TermData::App(sym, args) => {
                if let Symbol::Func(f) = sym {
                    self.discover(*f);
                    self.index.insert(item.owner, *f);
                }
                self.stack
                    .extend(args.iter().map(|&arg| WorkItem::new(arg, item.owner)));
            }
            TermData::Quant(q) => match check_patterns(terms, item.term, q, &self.discovered)? {
                GateDecision::Open => {
                    trace!(quantifier = %item.term, owner = %item.owner, "walking quantifier body");
                    self.stack.push(WorkItem::new(q.body, item.owner));
                }
                GateDecision::Blocked(blockers) => {
                    trace!(
                        quantifier = %item.term,
                        owner = %item.owner,
                        blockers = blockers.len(),
                        "deferring quantifier"
                    );
                    self.stats.quantifiers_deferred += 1;
                    for f in blockers {
                        self.pending.defer(f, item);
                    }
                }
            },
            TermData::Const(_) | TermData::Var(..) | TermData::Pattern(_) => {}
        }
        Ok(())
    }

    fn discover(&mut self, f: FuncId) {
        if !self.discovered.insert(f) {
            return;
        }
        let woken = self.pending.take(f);
        if !woken.is_empty() {
            trace!(
                symbol = %self.terms.func(f).name,
                count = woken.len(),
                "reactivating quantifiers"
            );
            self.stats.quantifiers_reactivated += woken.len();
            self.stack.extend(woken);
        }
    }

    /// Symbols discovered so far.
    #[must_use]
    pub fn discovered(&self) -> &HashSet<FuncId> {
        &self.discovered
    }

    /// The index built so far.
    #[must_use]
    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    /// Counters collected so far.
    #[must_use]
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Consume the state, keeping the index and counters.
    #[must_use]
    pub fn finish(self) -> (SymbolIndex, FilterStats) {
        (self.index, self.stats)
    }
}

/// Result of premise selection over a formula sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Positions of retained formulas, ascending
    pub kept: Vec<usize>,
    /// Positions of dropped formulas, ascending
    pub dropped: Vec<usize>,
    /// Run counters
    pub stats: FilterStats,
}

impl Selection {
    /// The retained formulas of `formulas`, in order.
    #[must_use]
    pub fn apply(&self, formulas: &[TermId]) -> Vec<TermId> {
        self.kept.iter().map(|&i| formulas[i]).collect()
    }
}

/// SInE premise filter over a term store.
#[derive(Clone, Copy)]
pub struct SineFilter<'a> {
    terms: &'a TermStore,
}

impl<'a> SineFilter<'a> {
    /// Create a filter reading terms from `terms`.
    #[must_use]
    pub fn new(terms: &'a TermStore) -> Self {
        SineFilter { terms }
    }

    /// Build the formula <-> symbol index for `formulas`.
    pub fn build_index(&self, formulas: &[TermId]) -> FilterResult<(SymbolIndex, FilterStats)> {
        let mut state = FilterState::new(self.terms);
        state.run(formulas)?;
        Ok(state.finish())
    }

    /// Decide which formulas to keep. An empty sequence selects nothing.
    pub fn select(&self, formulas: &[TermId]) -> FilterResult<Selection> {
        if formulas.is_empty() {
            debug!("sine: empty goal, nothing to select");
            return Ok(Selection::default());
        }

        let (index, mut stats) = self.build_index(formulas)?;
        let visited = reachable_from_conjecture(&index, formulas.len())?;

        let (kept, dropped): (Vec<usize>, Vec<usize>) =
            (0..formulas.len()).partition(|&i| visited.contains(&FormulaId(i as u32)));
        stats.formulas_out = kept.len();

        debug!(
            before = stats.formulas_in,
            after = stats.formulas_out,
            symbols = stats.symbols_discovered,
            deferred = stats.quantifiers_deferred,
            reactivated = stats.quantifiers_reactivated,
            "sine: premise selection finished"
        );

        Ok(Selection {
            kept,
            dropped,
            stats,
        })
    }

    /// The formulas of `formulas` relevant to its last element, in order.
    pub fn filter(&self, formulas: &[TermId]) -> FilterResult<Vec<TermId>> {
        Ok(self.select(formulas)?.apply(formulas))
    }
}
