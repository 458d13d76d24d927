//! Error types for data source configuration.

/// Errors that can occur while configuring a data source.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Ticker override is not of the form `NAME=SYMBOL`.
    #[error("invalid ticker override {0:?}, expected NAME=SYMBOL")]
    InvalidOverride(String),

    /// Name does not match a known price or change column.
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),
}
