//! Heteroskedasticity and autocorrelation consistent (HAC) coefficient covariance.
//!
//! The Newey-West estimator of the long-run covariance of the regression
//! scores `u_t = e_t * x_t`:
//! ```text
//! S = S_0 + Σ_{l=1}^{L} w_l * (Γ_l + Γ_l^T)
//! where:
//! - S_0 = (1/n) Σ_t u_t u_t^T
//! - Γ_l = (1/n) Σ_{t=l+1}^n u_t u_{t-l}^T
//! - w_l = 1 - l/(L+1) (Bartlett kernel weights)
//! ```
//! and the sandwich `Cov(β) = (X'X)^-1 (n S) (X'X)^-1`.
//!
//! With `L = 0` this is exactly the Eicker-Huber-White estimator.
//!
//! # References
//! - Newey, W. K., & West, K. D. (1987). "A Simple, Positive Semi-Definite,
//!   Heteroskedasticity and Autocorrelation Consistent Covariance Matrix."
//!   Econometrica, 55(3), 703-708.

use ndarray::{Array1, Array2, Axis, s};

use crate::MathError;

/// Bartlett kernel weight of lag `lag` for truncation lag `maxlags`.
///
/// Formula: w_l = 1 - l/(L+1) for l <= L, zero beyond.
#[must_use]
pub fn bartlett_weight(lag: usize, maxlags: usize) -> f64 {
    if lag > maxlags { 0.0 } else { 1.0 - lag as f64 / (maxlags as f64 + 1.0) }
}

fn check_shapes(
    x: &Array2<f64>,
    residuals: &Array1<f64>,
    xtx_inv: &Array2<f64>,
) -> Result<(), MathError> {
    let (n, k) = x.dim();
    if residuals.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: residuals.len() });
    }
    if xtx_inv.dim() != (k, k) {
        return Err(MathError::DimensionMismatch { expected: k, actual: xtx_inv.nrows() });
    }
    if n == 0 {
        return Err(MathError::Underdetermined { rows: 0, cols: k });
    }
    Ok(())
}

/// Per-observation scores `u_t = e_t * x_t` (n x k).
#[must_use]
pub fn score_matrix(x: &Array2<f64>, residuals: &Array1<f64>) -> Array2<f64> {
    x * &residuals.view().insert_axis(Axis(1))
}

/// Bartlett-weighted long-run covariance `S` of the score rows.
///
/// # Errors
/// Returns `MathError::InvalidLag` if `maxlags >= n`.
pub fn long_run_covariance(scores: &Array2<f64>, maxlags: usize) -> Result<Array2<f64>, MathError> {
    let n = scores.nrows();
    if maxlags >= n {
        return Err(MathError::InvalidLag { maxlags, nobs: n });
    }
    let n_f = n as f64;

    let mut s = scores.t().dot(scores) / n_f;
    for lag in 1..=maxlags {
        let lead = scores.slice(s![lag.., ..]);
        let lagged = scores.slice(s![..n - lag, ..]);
        let gamma = lead.t().dot(&lagged) / n_f;

        let weight = bartlett_weight(lag, maxlags);
        s.scaled_add(weight, &gamma);
        s.scaled_add(weight, &gamma.t());
    }

    Ok(s)
}

/// Newey-West HAC covariance of OLS coefficients.
///
/// # Arguments
/// * `x` - Design matrix (n x k)
/// * `residuals` - OLS residuals (n,)
/// * `xtx_inv` - Inverse cross-product matrix `(X'X)^-1` (k x k)
/// * `maxlags` - Truncation lag of the Bartlett kernel
///
/// # Returns
/// Covariance matrix of the coefficients (k x k).
///
/// # Errors
/// Returns `MathError::InvalidLag` if `maxlags >= n` and
/// `MathError::DimensionMismatch` on inconsistent shapes.
pub fn hac_covariance(
    x: &Array2<f64>,
    residuals: &Array1<f64>,
    xtx_inv: &Array2<f64>,
    maxlags: usize,
) -> Result<Array2<f64>, MathError> {
    check_shapes(x, residuals, xtx_inv)?;
    let n = x.nrows() as f64;

    let scores = score_matrix(x, residuals);
    let meat = long_run_covariance(&scores, maxlags)? * n;

    Ok(xtx_inv.dot(&meat).dot(xtx_inv))
}

/// Eicker-Huber-White heteroskedasticity-consistent covariance of OLS coefficients.
///
/// Computed directly as `(X'X)^-1 X' diag(e^2) X (X'X)^-1`.
///
/// # Errors
/// Returns `MathError::DimensionMismatch` on inconsistent shapes.
pub fn white_covariance(
    x: &Array2<f64>,
    residuals: &Array1<f64>,
    xtx_inv: &Array2<f64>,
) -> Result<Array2<f64>, MathError> {
    check_shapes(x, residuals, xtx_inv)?;

    let squared = residuals.mapv(|e| e * e);
    let weighted = x * &squared.view().insert_axis(Axis(1));
    let meat = x.t().dot(&weighted);

    Ok(xtx_inv.dot(&meat).dot(xtx_inv))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use rand_distr::Normal;
    use rstest::rstest;

    use super::*;
    use crate::ordinary_least_squares;

    fn random_regression(n: usize, seed: u64) -> (Array1<f64>, Array2<f64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::<f64>::new(0.0, 1.0).unwrap();
        let x =
            Array2::from_shape_fn((n, 3), |(_, j)| if j == 0 { 1.0 } else { rng.sample(noise) });
        // Heteroskedastic errors scaled by the first factor.
        let y = x
            .rows()
            .into_iter()
            .map(|r| 0.5 + 1.5 * r[1] - 0.7 * r[2] + (1.0 + r[1].abs()) * rng.sample(noise))
            .collect();
        (y, x)
    }

    #[rstest]
    #[case(0, 4, 1.0)]
    #[case(1, 4, 0.8)]
    #[case(2, 4, 0.6)]
    #[case(4, 4, 0.2)]
    #[case(5, 4, 0.0)]
    #[case(1, 1, 0.5)]
    fn bartlett_weights(#[case] lag: usize, #[case] maxlags: usize, #[case] expected: f64) {
        assert_relative_eq!(bartlett_weight(lag, maxlags), expected, epsilon = 1e-12);
    }

    #[test]
    fn zero_lags_equals_white() {
        let (y, x) = random_regression(200, 11);
        let fit = ordinary_least_squares(&y, &x).unwrap();

        let hac = hac_covariance(&x, &fit.residuals, &fit.xtx_inv, 0).unwrap();
        let white = white_covariance(&x, &fit.residuals, &fit.xtx_inv).unwrap();

        for (a, b) in hac.iter().zip(white.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-15, max_relative = 1e-8);
        }
    }

    #[test]
    fn covariance_is_symmetric() {
        let (y, x) = random_regression(150, 3);
        let fit = ordinary_least_squares(&y, &x).unwrap();

        let cov = hac_covariance(&x, &fit.residuals, &fit.xtx_inv, 5).unwrap();

        assert_eq!(cov.dim(), (3, 3));
        for i in 0..3 {
            assert!(cov[[i, i]] > 0.0);
            for j in 0..3 {
                assert_relative_eq!(cov[[i, j]], cov[[j, i]], epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn alternating_residuals_by_hand() {
        // Intercept only, e = [1, -1, 1, -1], L = 1:
        // S_0 = 1, Γ_1 = -3/4, w_1 = 1/2, S = 1 + 1/2 * (-3/2) = 1/4
        // Cov = (1/4) * (4 * 1/4) * (1/4) = 1/16
        let x = Array2::ones((4, 1));
        let e = array![1.0, -1.0, 1.0, -1.0];
        let xtx_inv = array![[0.25]];

        let hac = hac_covariance(&x, &e, &xtx_inv, 1).unwrap();
        let white = white_covariance(&x, &e, &xtx_inv).unwrap();

        assert_relative_eq!(hac[[0, 0]], 0.0625, epsilon = 1e-12);
        assert_relative_eq!(white[[0, 0]], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn positive_autocorrelation_inflates_variance() {
        let n = 100;
        let x = Array2::ones((n, 1));
        let e: Array1<f64> = (0..n).map(|t| (t as f64 / 10.0).sin()).collect();
        let xtx_inv = array![[1.0 / n as f64]];

        let hac = hac_covariance(&x, &e, &xtx_inv, 5).unwrap();
        let white = white_covariance(&x, &e, &xtx_inv).unwrap();

        assert!(hac[[0, 0]] > white[[0, 0]]);
    }

    #[test]
    fn lag_must_be_smaller_than_sample() {
        let x = Array2::ones((5, 1));
        let e = array![0.1, -0.2, 0.3, -0.1, 0.0];
        let xtx_inv = array![[0.2]];

        assert!(hac_covariance(&x, &e, &xtx_inv, 4).is_ok());
        assert!(matches!(
            hac_covariance(&x, &e, &xtx_inv, 5),
            Err(MathError::InvalidLag { maxlags: 5, nobs: 5 })
        ));
    }

    #[test]
    fn zero_residuals_give_zero_covariance() {
        let x = Array2::from_shape_fn((10, 2), |(i, j)| if j == 0 { 1.0 } else { i as f64 });
        let e = Array1::zeros(10);
        let xtx_inv = Array2::eye(2);

        let cov = hac_covariance(&x, &e, &xtx_inv, 3).unwrap();

        assert!(cov.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let x = Array2::ones((5, 2));
        let e = array![0.1, 0.2];
        let xtx_inv = Array2::eye(2);

        assert!(matches!(
            white_covariance(&x, &e, &xtx_inv),
            Err(MathError::DimensionMismatch { expected: 5, actual: 2 })
        ));
    }
}
