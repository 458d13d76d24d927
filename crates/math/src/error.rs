//! Error types for mathematical operations.

/// Errors that can occur during mathematical operations.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Not more observations than unknowns.
    #[error("underdetermined system: {rows} observations for {cols} unknowns")]
    Underdetermined {
        /// Number of observations.
        rows: usize,
        /// Number of unknowns.
        cols: usize,
    },

    /// Design matrix does not have full column rank.
    #[error("rank deficient design matrix at column {column}")]
    RankDeficient {
        /// First column found to be linearly dependent.
        column: usize,
    },

    /// Truncation lag must be smaller than the sample.
    #[error("invalid lag: maxlags {maxlags} with {nobs} observations")]
    InvalidLag {
        /// Requested truncation lag.
        maxlags: usize,
        /// Number of observations.
        nobs: usize,
    },

    /// Invalid distribution parameters.
    #[error("distribution error: {0}")]
    Distribution(String),
}
