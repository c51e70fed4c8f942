//! Error types for correlation.
//!
//! None of these block navigation: callers degrade to the coarse
//! position reported by the oracle.

use thiserror::Error;

/// Errors that can occur while correlating two representations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The coarse locator had no record for the requested position.
    #[error("no oracle match for the requested position")]
    NoOracleMatch,

    /// Tokenization produced zero tokens on one side.
    #[error("context is empty")]
    EmptyContext,

    /// The marked index does not fit the alignment built from the same context.
    #[error("marked index {marked} out of range for {aligned} aligned query tokens")]
    AlignmentIndexInvariantViolation { marked: usize, aligned: usize },

    /// Neither the marked token nor its direct neighbours were matched.
    #[error("no match within one token of marked index {marked}")]
    ResolutionGapExhausted { marked: usize },

    /// The partner of a paired construct could not be located.
    #[error("no enclosing construct at offset {offset}")]
    RegionHeuristicMiss { offset: usize },

    /// Invalid configuration value or file.
    #[error("configuration error: {message}")]
    Config { message: String },
}

/// Result type for correlation operations.
pub type SyncResult<T> = Result<T, SyncError>;
