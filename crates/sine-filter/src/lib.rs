//! SInE (Sine Qua Non) premise selection
//!
//! Drops the formulas of a goal that share no uninterpreted symbol, directly
//! or transitively, with its last formula. Quantified formulas with trigger
//! patterns only contribute their bodies once a pattern is supported by
//! symbols already known to be relevant.
//!
//! The selection is a heuristic: it may drop formulas a proof needs. The
//! resulting goal is therefore marked as an over-approximation.
//!
//! # Architecture
//!
//! - `SymbolIndex`: formula <-> symbol relation built during the walk
//! - `gate`: trigger-pattern checks and parked quantifiers
//! - `SineFilter`: worklist walk plus reachability from the conjecture
//! - `SineTactic`: goal-level wrapper with depth/precision bookkeeping
//!
//! # Example
//!
//! ```
//! use sine_core::{Sort, TermStore};
//! use sine_filter::SineFilter;
//!
//! let mut store = TermStore::new();
//! let u = Sort::Uninterpreted("U".to_string());
//! let p = store.declare_fun("P", vec![u.clone()], Sort::Bool);
//! let q = store.declare_fun("Q", vec![u.clone()], Sort::Bool);
//! let a = store.declare_const("a", u.clone());
//! let b = store.declare_const("b", u);
//! let (a, b) = (store.mk_const(a), store.mk_const(b));
//! let pa = store.mk_app(p, vec![a]);
//! let qb = store.mk_app(q, vec![b]);
//! let pb = store.mk_app(p, vec![b]);
//!
//! let kept = SineFilter::new(&store).filter(&[pa, qb, pb]).unwrap();
//! assert_eq!(kept, vec![pa, qb, pb]);
//! ```

pub mod config;
pub mod converter;
mod error;
pub mod filter;
pub mod gate;
pub mod index;
pub mod reach;
pub mod tactic;

pub use config::{ParamDescr, ParamValue, SineConfig};
pub use converter::{FilterModelConverter, ModelConverter};
pub use error::{FilterError, FilterResult};
pub use filter::{FilterState, FilterStats, Selection, SineFilter};
pub use index::{FormulaId, SymbolIndex};
pub use tactic::{SineTactic, Tactic, TacticOutput};
