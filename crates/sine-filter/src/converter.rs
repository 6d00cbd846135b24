//! Model converters
//!
//! A preprocessing step that changes a goal hands back a converter that maps
//! a model of the new goal to a model of the old one.

use sine_core::{FuncId, Model};
use std::fmt;

/// Maps models of a transformed goal back to the goal it came from.
pub trait ModelConverter: fmt::Debug {
    /// Rewrite `model` in place.
    fn convert(&self, model: &mut Model);
}

/// Converter for steps that only remove formulas.
///
/// Removing formulas never invalidates a model, so conversion only hides
/// the interpretations of auxiliary declarations the step introduced. The
/// dropped formula positions are kept for callers that reconcile proofs or
/// cores against the original goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterModelConverter {
    hidden: Vec<FuncId>,
    dropped: Vec<usize>,
}

impl FilterModelConverter {
    /// Converter that hides nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter recording the positions dropped from the original goal.
    #[must_use]
    pub fn with_dropped(dropped: Vec<usize>) -> Self {
        FilterModelConverter {
            hidden: Vec::new(),
            dropped,
        }
    }

    /// Remove `f` from converted models.
    pub fn hide(&mut self, f: FuncId) {
        if !self.hidden.contains(&f) {
            self.hidden.push(f);
        }
    }

    /// Declarations removed from converted models.
    #[must_use]
    pub fn hidden(&self) -> &[FuncId] {
        &self.hidden
    }

    /// Positions of the original goal that were dropped.
    #[must_use]
    pub fn dropped(&self) -> &[usize] {
        &self.dropped
    }
}

impl ModelConverter for FilterModelConverter {
    fn convert(&self, model: &mut Model) {
        for &f in &self.hidden {
            model.remove(f);
        }
    }
}
