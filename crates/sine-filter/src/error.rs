//! Error types for premise filtering

use sine_core::TermId;
use thiserror::Error;

/// Premise filter errors
///
/// Filtering is total over well-formed goals; every variant is a broken
/// caller contract rather than a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("empty input: no formula to use as the conjecture")]
    EmptyInput,

    #[error("unknown term {0}")]
    UnknownTerm(TermId),

    #[error("quantifier {quantifier} lists {pattern}, which is not a pattern")]
    MalformedPattern { quantifier: TermId, pattern: TermId },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
