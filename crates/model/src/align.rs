//! Date alignment of one asset with its factors.

use macrobeta_math::MathError;
use macrobeta_primitives::{Asset, ChangesTable, Date, Factor};
use ndarray::{Array1, Array2};

use crate::ModelError;

/// Missing-value-free sample of one asset and its factors.
///
/// Holds only the dates on which the asset and every factor have a value,
/// in the table's date order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSample {
    asset: Asset,
    factors: Vec<Factor>,
    dates: Vec<Date>,
    response: Array1<f64>,
    regressors: Array2<f64>,
}

impl AlignedSample {
    /// Align `asset` with `factors` in `changes`.
    ///
    /// # Errors
    /// Returns `ModelError::MissingColumn` if the asset or a factor is absent.
    pub fn new(
        changes: &ChangesTable,
        asset: Asset,
        factors: &[Factor],
    ) -> Result<Self, ModelError> {
        let response_col =
            changes.column(asset).ok_or_else(|| ModelError::MissingColumn(asset.to_string()))?;
        let factor_cols = factors
            .iter()
            .map(|f| changes.column(*f).ok_or_else(|| ModelError::MissingColumn(f.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let mut dates = Vec::new();
        let mut response = Vec::new();
        let mut regressors = Vec::new();
        for (row, date) in changes.dates().iter().enumerate() {
            let Some(y) = response_col[row] else { continue };
            let Some(x) = factor_cols.iter().map(|c| c[row]).collect::<Option<Vec<f64>>>() else {
                continue;
            };
            dates.push(*date);
            response.push(y);
            regressors.extend(x);
        }

        let shape = (dates.len(), factors.len());
        let regressors = Array2::from_shape_vec(shape, regressors).map_err(|_| {
            MathError::DimensionMismatch { expected: shape.0 * shape.1, actual: shape.0 }
        })?;

        Ok(Self {
            asset,
            factors: factors.to_vec(),
            dates,
            response: Array1::from_vec(response),
            regressors,
        })
    }

    /// Regressed asset.
    #[must_use]
    pub const fn asset(&self) -> Asset {
        self.asset
    }

    /// Factors, in regressor column order.
    #[must_use]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Surviving dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Asset changes (n,).
    #[must_use]
    pub const fn response(&self) -> &Array1<f64> {
        &self.response
    }

    /// Factor changes (n x factors).
    #[must_use]
    pub const fn regressors(&self) -> &Array2<f64> {
        &self.regressors
    }

    /// Number of aligned observations.
    #[must_use]
    pub fn nobs(&self) -> usize {
        self.dates.len()
    }
}
