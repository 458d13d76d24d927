//! Per-asset OLS fit and its HAC covariance.

use macrobeta_math::{MathError, OlsFit, hac_covariance, ordinary_least_squares};
use macrobeta_primitives::Asset;
use ndarray::{Array1, Array2};

use crate::{DesignMatrix, ModelError};

/// Ordinary least squares of an asset on its design matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct OlsEstimator;

impl OlsEstimator {
    /// Fit `response` on `design`.
    ///
    /// # Errors
    /// Returns `ModelError::InsufficientObservations` if n <= k and
    /// `ModelError::SingularDesign` if the columns are linearly dependent.
    pub fn fit(
        &self,
        asset: Asset,
        response: &Array1<f64>,
        design: &DesignMatrix,
    ) -> Result<OlsFit, ModelError> {
        let (nobs, columns) = (design.nobs(), design.ncols());
        if nobs <= columns {
            return Err(ModelError::InsufficientObservations { asset, nobs, columns });
        }

        ordinary_least_squares(response, design.matrix()).map_err(|e| match e {
            MathError::Underdetermined { rows, cols } => {
                ModelError::InsufficientObservations { asset, nobs: rows, columns: cols }
            }
            MathError::RankDeficient { .. } => ModelError::SingularDesign { asset },
            other => ModelError::Math(other),
        })
    }
}

/// Newey-West covariance of OLS coefficients with a Bartlett kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HacCovarianceEstimator {
    maxlags: usize,
    small_sample_correction: bool,
}

impl HacCovarianceEstimator {
    /// Estimator truncated at `maxlags`, without small-sample correction.
    #[must_use]
    pub const fn new(maxlags: usize) -> Self {
        Self { maxlags, small_sample_correction: false }
    }

    /// Scale the covariance by n / (n - k).
    #[must_use]
    pub const fn with_small_sample_correction(mut self, enabled: bool) -> Self {
        self.small_sample_correction = enabled;
        self
    }

    /// Truncation lag.
    #[must_use]
    pub const fn maxlags(&self) -> usize {
        self.maxlags
    }

    /// Covariance matrix (k x k) of the fitted coefficients.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidLag` if `maxlags >= n`.
    pub fn covariance(
        &self,
        design: &DesignMatrix,
        fit: &OlsFit,
    ) -> Result<Array2<f64>, ModelError> {
        let nobs = design.nobs();
        if self.maxlags >= nobs {
            let maxlags = i64::try_from(self.maxlags).unwrap_or(i64::MAX);
            return Err(ModelError::InvalidLag { maxlags, nobs });
        }

        let cov = hac_covariance(design.matrix(), &fit.residuals, &fit.xtx_inv, self.maxlags)?;
        if self.small_sample_correction {
            let dof = nobs.saturating_sub(design.ncols()).max(1);
            Ok(cov * (nobs as f64 / dof as f64))
        } else {
            Ok(cov)
        }
    }

    /// Square roots of the covariance diagonal.
    ///
    /// # Errors
    /// Same as [`Self::covariance`].
    pub fn standard_errors(
        &self,
        design: &DesignMatrix,
        fit: &OlsFit,
    ) -> Result<Array1<f64>, ModelError> {
        Ok(self.covariance(design, fit)?.diag().mapv(f64::sqrt))
    }
}

impl Default for HacCovarianceEstimator {
    fn default() -> Self {
        Self::new(5)
    }
}
