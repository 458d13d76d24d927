//! Data transformation trait definitions.

use macrobeta_primitives::ChangeKind;
use polars::prelude::*;

/// Errors that can occur while applying a transformation.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Source column is not in the frame.
    #[error("missing source column: {0}")]
    MissingColumn(String),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] PolarsError),
}

/// Time-series data transformation.
///
/// Operates on a wide, date-sorted frame. Each call transforms one column and
/// preserves row order.
pub trait TimeSeriesTransform: Send + Sync {
    /// Transform the source column into a change series.
    ///
    /// # Arguments
    /// * `source_col` - Column holding the price level
    ///
    /// # Returns
    /// Polars expression representing the transformation. The first row is
    /// always null.
    fn transform(&self, source_col: &str) -> Expr;

    /// Change convention this transformation produces.
    fn kind(&self) -> ChangeKind;

    /// Returns the name of this transformation.
    fn name(&self) -> &str;

    /// Evaluate the transformation on `frame`, naming the output `target_col`.
    ///
    /// # Errors
    /// Returns `TransformError::MissingColumn` if `source_col` is absent.
    fn apply(
        &self,
        frame: &DataFrame,
        source_col: &str,
        target_col: &str,
    ) -> Result<Column, TransformError> {
        if frame.column(source_col).is_err() {
            return Err(TransformError::MissingColumn(source_col.to_string()));
        }
        let out =
            frame.clone().lazy().select([self.transform(source_col).alias(target_col)]).collect()?;
        Ok(out.column(target_col)?.clone())
    }
}
