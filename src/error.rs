//! Error types.

use thiserror::Error;

/// Configuration errors raised before any allocation work starts.
///
/// Under-supply and non-compliant groups are not errors; they are
/// reported as data by [`Reporter`](crate::report::Reporter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormationError {
    /// The pool holds no candidates.
    #[error("no candidates provided")]
    EmptyPool,

    /// The requested group size is below 2.
    #[error("group size must be at least 2, got {size}")]
    GroupSizeTooSmall { size: usize },

    /// Fewer candidates than one group needs.
    #[error("not enough candidates to form even one group: have {available}, need at least {required}")]
    PoolTooSmall { available: usize, required: usize },

    /// A configuration struct failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results carrying a [`FormationError`].
pub type Result<T> = std::result::Result<T, FormationError>;
