//! Sort system
//!
//! Sorts are the types of terms in SMT-LIB. The filter never inspects them;
//! they are carried so that declarations and binders can be printed back.

use std::fmt;

/// A sort (type) in the SMT-LIB language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sort {
    /// Boolean sort
    Bool,
    /// Integer sort
    Int,
    /// Real sort
    Real,
    /// Uninterpreted sort introduced by `declare-sort`
    Uninterpreted(String),
}

impl Sort {
    /// Returns true for the Boolean sort.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Sort::Bool)
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Bool => write!(f, "Bool"),
            Sort::Int => write!(f, "Int"),
            Sort::Real => write!(f, "Real"),
            Sort::Uninterpreted(name) => write!(f, "{}", name),
        }
    }
}
