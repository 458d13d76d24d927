//! Daily change series from closing prices.

use macrobeta_primitives::{ChangeKind, ChangesTable, DATE_COLUMN, Instrument, PriceTable};
use macrobeta_traits::TimeSeriesTransform;
use polars::prelude::*;

use crate::UtilsError;

/// Last observed value before each row, skipping gaps.
fn previous(source_col: &str) -> Expr {
    col(source_col).forward_fill(None).shift(lit(1))
}

/// Simple return in percent: 100 * (p_t / p_{t-1} - 1).
///
/// `p_{t-1}` is the last observed price, so a gap in the series does not
/// remove the change after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentChange;

impl TimeSeriesTransform for PercentChange {
    fn transform(&self, source_col: &str) -> Expr {
        (col(source_col) / previous(source_col) - lit(1.0)) * lit(100.0)
    }

    fn kind(&self) -> ChangeKind {
        ChangeKind::Percent
    }

    fn name(&self) -> &str {
        "percent_change"
    }
}

/// Yield change in basis points for yields quoted in percent: 100 * (y_t - y_{t-1}).
#[derive(Debug, Clone, Copy, Default)]
pub struct BasisPointChange;

impl TimeSeriesTransform for BasisPointChange {
    fn transform(&self, source_col: &str) -> Expr {
        (col(source_col) - previous(source_col)) * lit(100.0)
    }

    fn kind(&self) -> ChangeKind {
        ChangeKind::BasisPoints
    }

    fn name(&self) -> &str {
        "basis_point_change"
    }
}

/// Transformation producing an instrument's change convention.
#[must_use]
pub fn transform_for(instrument: Instrument) -> &'static dyn TimeSeriesTransform {
    match instrument.change_kind() {
        ChangeKind::Percent => &PercentChange,
        ChangeKind::BasisPoints => &BasisPointChange,
    }
}

/// Convert a price table into daily changes.
///
/// Every price column becomes its instrument's change column. The first date
/// has no predecessor and is dropped.
///
/// # Errors
/// Returns `UtilsError` if a transformation fails or the result is not a
/// valid changes table.
pub fn build_changes(prices: &PriceTable) -> Result<ChangesTable, UtilsError> {
    if prices.is_empty() {
        return Ok(ChangesTable::default());
    }

    let frame = prices.to_frame()?;
    let mut columns = vec![frame.column(DATE_COLUMN)?.clone()];
    for instrument in prices.instruments() {
        let transform = transform_for(instrument);
        columns.push(transform.apply(&frame, instrument.price_name(), instrument.name())?);
    }

    let changes = DataFrame::new(columns)?;
    let changes = changes.slice(1, changes.height().saturating_sub(1));
    Ok(ChangesTable::from_frame(&changes)?)
}
