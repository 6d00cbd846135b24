//! SINE Core - Common types for the SInE premise filter
//!
//! This crate provides the foundational types shared across the workspace:
//! - Term representation (hash-consed DAG with integer handles)
//! - Sort system (carried for printing only)
//! - Goals (ordered formula containers with depth/precision bookkeeping)
//! - Model types (interpretations of uninterpreted symbols)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod goal;
pub mod model;
pub mod sort;
pub mod term;

pub use goal::{Goal, Precision};
pub use model::Model;
pub use sort::Sort;
pub use term::{
    Constant, FuncDecl, FuncId, Op, QuantKind, Quantifier, Symbol, TermData, TermId, TermStore,
};
