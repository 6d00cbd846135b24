//! Goal-level tactic interface and the sine premise-selection tactic.

use crate::config::{ParamDescr, ParamValue, SineConfig};
use crate::converter::{FilterModelConverter, ModelConverter};
use crate::error::FilterResult;
use crate::filter::{FilterStats, SineFilter};
use sine_core::{Goal, Precision, TermStore};
use tracing::{debug, info};

/// What a tactic produces from one goal.
#[derive(Debug)]
pub struct TacticOutput {
    /// Resulting subgoals
    pub goals: Vec<Goal>,
    /// Converter from models of `goals` to models of the input goal
    pub model_converter: Option<Box<dyn ModelConverter>>,
    /// Counters of the run
    pub stats: FilterStats,
}

/// A goal transformation.
pub trait Tactic {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Transform `goal`, whose formulas live in `terms`.
    fn apply(&mut self, terms: &TermStore, goal: Goal) -> FilterResult<TacticOutput>;

    /// Apply a parameter setting. Returns false for keys the tactic ignores.
    fn update_param(&mut self, key: &str, value: &ParamValue) -> bool;

    /// Parameters the tactic understands.
    fn param_descrs(&self) -> Vec<ParamDescr>;
}

/// Sine Qua Non premise selection as a tactic.
///
/// Keeps only the formulas connected to the last formula of the goal. The
/// result is marked as an over-approximation: dropping premises can only
/// turn an unsatisfiable goal satisfiable, never the reverse.
#[derive(Debug, Clone, Default)]
pub struct SineTactic {
    config: SineConfig,
}

impl SineTactic {
    /// Create the tactic with the given configuration.
    #[must_use]
    pub fn new(config: SineConfig) -> Self {
        SineTactic { config }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &SineConfig {
        &self.config
    }
}

impl Tactic for SineTactic {
    fn name(&self) -> &'static str {
        "sine-filter"
    }

    fn apply(&mut self, terms: &TermStore, mut goal: Goal) -> FilterResult<TacticOutput> {
        if goal.is_empty() {
            debug!("sine: empty goal left unchanged");
            return Ok(TacticOutput {
                goals: vec![goal],
                model_converter: None,
                stats: FilterStats::default(),
            });
        }

        let formulas = goal.formulas().to_vec();
        let selection = SineFilter::new(terms).select(&formulas)?;
        if self.config.verbose {
            info!(before = formulas.len(), after = selection.kept.len(), "sine: goal size");
        } else {
            debug!(before = formulas.len(), after = selection.kept.len(), "sine: goal size");
        }

        goal.reset();
        for t in selection.apply(&formulas) {
            goal.assert_expr(t);
        }
        goal.inc_depth();
        goal.update_precision(Precision::Over);

        Ok(TacticOutput {
            goals: vec![goal],
            model_converter: Some(Box::new(FilterModelConverter::with_dropped(
                selection.dropped,
            ))),
            stats: selection.stats,
        })
    }

    fn update_param(&mut self, key: &str, value: &ParamValue) -> bool {
        self.config.update(key, value)
    }

    fn param_descrs(&self) -> Vec<ParamDescr> {
        SineConfig::param_descrs()
    }
}
