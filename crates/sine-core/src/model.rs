//! Models: interpretations of uninterpreted constants.

use crate::term::{FuncId, TermId};
use hashbrown::HashMap;

/// A (partial) model assigning a value term to uninterpreted symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    assignments: HashMap<FuncId, TermId>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret `f` as `value`, returning the previous interpretation.
    pub fn assign(&mut self, f: FuncId, value: TermId) -> Option<TermId> {
        self.assignments.insert(f, value)
    }

    /// Interpretation of `f`, if any.
    #[must_use]
    pub fn get(&self, f: FuncId) -> Option<TermId> {
        self.assignments.get(&f).copied()
    }

    /// Forget the interpretation of `f`.
    pub fn remove(&mut self, f: FuncId) -> Option<TermId> {
        self.assignments.remove(&f)
    }

    /// Number of interpreted symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns true if nothing is interpreted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterate over interpretations in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (FuncId, TermId)> + '_ {
        self.assignments.iter().map(|(&f, &v)| (f, v))
    }
}
