//! Error types for table construction.

/// Errors that can occur while building or reading a date-indexed table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Column name is not part of the known schema.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// The same instrument appears twice.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// The frame has no date column.
    #[error("missing date column")]
    MissingDateColumn,

    /// A date value is null or out of range.
    #[error("invalid date at row {0}")]
    InvalidDate(usize),

    /// Dates must be unique and ascending.
    #[error("dates must be strictly increasing (row {0})")]
    UnsortedDates(usize),

    /// A column's length differs from the date index.
    #[error("column {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        /// Offending column.
        column: String,
        /// Number of dates.
        expected: usize,
        /// Number of values.
        actual: usize,
    },

    /// A column cannot be read as floating point.
    #[error("column {column} has non-numeric type {dtype}")]
    NonNumericColumn {
        /// Offending column.
        column: String,
        /// Polars data type of the column.
        dtype: String,
    },

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
