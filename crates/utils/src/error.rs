//! Error types for utility functions.

use macrobeta_primitives::TableError;
use macrobeta_traits::TransformError;

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Transformation error.
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    /// Table error.
    #[error("table error: {0}")]
    Table(#[from] TableError),
}
