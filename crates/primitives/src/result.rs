//! Regression output types.

use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Asset, Parameter, TableError};

/// Statistics of one (asset, parameter) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Regressed asset.
    pub asset: Asset,
    /// Regressor the coefficient belongs to.
    #[serde(rename = "param")]
    pub parameter: Parameter,
    /// Estimated coefficient.
    pub coef: f64,
    /// t-statistic from the HAC standard error.
    pub t: f64,
    /// Two-sided p-value of the t-statistic.
    pub p: f64,
    /// R-squared of the asset's regression.
    pub r2: f64,
    /// Observations used in the asset's regression.
    pub nobs: usize,
}

impl RegressionResult {
    /// Sort key: asset name, then parameter name.
    #[must_use]
    pub const fn key(&self) -> (&'static str, &'static str) {
        (self.asset.name(), self.parameter.name())
    }
}

/// Tidy table of regression results.
///
/// Rows are unique by (asset, parameter) and sorted ascending by the
/// lexicographic order of their names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    rows: Vec<RegressionResult>,
}

impl ResultTable {
    /// Build a table from rows in any order.
    ///
    /// # Panics
    /// Panics if two rows share the same (asset, parameter) key.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = RegressionResult>) -> Self {
        let mut rows: Vec<RegressionResult> = rows.into_iter().collect();
        rows.sort_by(|a, b| a.key().cmp(&b.key()));
        if let Some(pair) = rows.windows(2).find(|w| w[0].key() == w[1].key()) {
            let (asset, parameter) = pair[0].key();
            panic!("duplicate result row for ({asset}, {parameter})");
        }
        Self { rows }
    }

    /// Rows in key order.
    #[must_use]
    pub fn rows(&self) -> &[RegressionResult] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for one (asset, parameter) pair.
    #[must_use]
    pub fn get(&self, asset: Asset, parameter: Parameter) -> Option<&RegressionResult> {
        self.rows
            .binary_search_by(|row| row.key().cmp(&(asset.name(), parameter.name())))
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Distinct assets, in key order.
    #[must_use]
    pub fn assets(&self) -> Vec<Asset> {
        let mut assets: Vec<Asset> = self.rows.iter().map(|row| row.asset).collect();
        assets.dedup();
        assets
    }

    /// Convert to a tidy polars frame with columns
    /// asset, param, coef, t, p, r2, nobs.
    ///
    /// # Errors
    /// Returns `TableError::Polars` if the frame cannot be assembled.
    pub fn to_frame(&self) -> Result<DataFrame, TableError> {
        let column = |name: &str, f: fn(&RegressionResult) -> f64| {
            Column::new(name.into(), self.rows.iter().map(f).collect::<Vec<f64>>())
        };

        let frame = DataFrame::new(vec![
            Column::new(
                "asset".into(),
                self.rows.iter().map(|r| r.asset.name()).collect::<Vec<_>>(),
            ),
            Column::new(
                "param".into(),
                self.rows.iter().map(|r| r.parameter.name()).collect::<Vec<_>>(),
            ),
            column("coef", |r| r.coef),
            column("t", |r| r.t),
            column("p", |r| r.p),
            column("r2", |r| r.r2),
            Column::new(
                "nobs".into(),
                self.rows.iter().map(|r| r.nobs as u64).collect::<Vec<u64>>(),
            ),
        ])?;

        Ok(frame)
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a RegressionResult;
    type IntoIter = std::slice::Iter<'a, RegressionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Fixed-width text rendering, values rounded to four decimals.
///
/// Rounding happens only here; the stored values are untouched.
impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:<10} {:>10} {:>10} {:>8} {:>8} {:>6}",
            "asset", "param", "coef", "t", "p", "r2", "nobs"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<12} {:<10} {:>10.4} {:>10.4} {:>8.4} {:>8.4} {:>6}",
                row.asset.name(),
                row.parameter.name(),
                row.coef,
                row.t,
                row.p,
                row.r2,
                row.nobs
            )?;
        }
        Ok(())
    }
}
