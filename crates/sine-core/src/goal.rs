//! Goals: ordered formula containers handed between preprocessing steps.

use crate::term::TermId;

/// How a goal relates to the problem it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Equisatisfiable with the original problem
    #[default]
    Precise,
    /// Under-approximation: a model of the goal is a model of the original
    Under,
    /// Over-approximation: an unsat goal proves the original unsat
    Over,
    /// Both approximations were applied; neither answer transfers
    UnderOver,
}

impl Precision {
    /// Combine two precisions; approximations accumulate.
    #[must_use]
    pub fn join(self, other: Precision) -> Precision {
        use Precision::*;
        match (self, other) {
            (Precise, p) | (p, Precise) => p,
            (Under, Under) => Under,
            (Over, Over) => Over,
            _ => UnderOver,
        }
    }
}

/// An ordered sequence of asserted formulas.
///
/// By convention the last formula is the query whose relevance seeds
/// premise selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Goal {
    formulas: Vec<TermId>,
    depth: u32,
    precision: Precision,
}

impl Goal {
    /// Create an empty goal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a goal asserting `formulas` in order.
    #[must_use]
    pub fn from_formulas(formulas: Vec<TermId>) -> Self {
        Goal {
            formulas,
            ..Self::default()
        }
    }

    /// Number of formulas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    /// Returns true if nothing is asserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// The formula at position `i`.
    #[must_use]
    pub fn form(&self, i: usize) -> Option<TermId> {
        self.formulas.get(i).copied()
    }

    /// All formulas in order.
    #[must_use]
    pub fn formulas(&self) -> &[TermId] {
        &self.formulas
    }

    /// The last formula, if any.
    #[must_use]
    pub fn conjecture(&self) -> Option<TermId> {
        self.formulas.last().copied()
    }

    /// Drop every formula, keeping depth and precision.
    pub fn reset(&mut self) {
        self.formulas.clear();
    }

    /// Append a formula.
    pub fn assert_expr(&mut self, t: TermId) {
        self.formulas.push(t);
    }

    /// Number of transformations applied so far.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Record that one more transformation was applied.
    pub fn inc_depth(&mut self) {
        self.depth += 1;
    }

    /// Current precision.
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Weaken the precision by `p`.
    pub fn update_precision(&mut self, p: Precision) {
        self.precision = self.precision.join(p);
    }
}
