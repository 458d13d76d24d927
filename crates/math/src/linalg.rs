//! Linear algebra operations for beta estimation.

use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1, ArrayViewMut2, s};

use crate::MathError;

/// Size of a diagonal entry of R, relative to the norm of its own column,
/// below which the column is treated as linearly dependent on the previous ones.
const RANK_TOLERANCE: f64 = 1e-10;

/// Result of ordinary least squares regression.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Estimated coefficients, one per design column.
    pub coefficients: Array1<f64>,
    /// Fitted values.
    pub fitted: Array1<f64>,
    /// Residuals.
    pub residuals: Array1<f64>,
    /// R-squared; zero when the response has no variance.
    pub r_squared: f64,
    /// Inverse of the cross-product matrix `X'X`.
    pub xtx_inv: Array2<f64>,
}

impl OlsFit {
    /// Number of observations.
    #[must_use]
    pub fn nobs(&self) -> usize {
        self.residuals.len()
    }

    /// Number of design columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.coefficients.len()
    }
}

/// Householder QR factorization of a tall matrix.
#[derive(Debug, Clone)]
pub struct QrDecomposition {
    /// Matrix after all reflections; R sits in its upper triangle.
    reduced: Array2<f64>,
    /// Householder vector of each column, `None` when the column was already zero.
    reflectors: Vec<Option<Array1<f64>>>,
    /// Euclidean norm of each input column.
    column_norms: Vec<f64>,
}

impl QrDecomposition {
    /// Factorize `x` (n x k, n >= k).
    ///
    /// # Errors
    /// Returns `MathError::Underdetermined` if `x` has fewer rows than columns.
    pub fn new(x: &Array2<f64>) -> Result<Self, MathError> {
        let (n, k) = x.dim();
        if n < k {
            return Err(MathError::Underdetermined { rows: n, cols: k });
        }

        let column_norms = x.columns().into_iter().map(|c| c.dot(&c).sqrt()).collect();
        let mut reduced = x.to_owned();
        let mut reflectors = Vec::with_capacity(k);
        for j in 0..k {
            let v = householder_vector(reduced.slice(s![j.., j]));
            if let Some(v) = &v {
                reflect_columns(v, reduced.slice_mut(s![j.., j..]));
            }
            reflectors.push(v);
        }

        Ok(Self { reduced, reflectors, column_norms })
    }

    /// Number of columns of the factorized matrix.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.reflectors.len()
    }

    /// Upper triangular factor R (k x k).
    #[must_use]
    pub fn r(&self) -> Array2<f64> {
        let k = self.ncols();
        Array2::from_shape_fn((k, k), |(i, j)| if i <= j { self.reduced[[i, j]] } else { 0.0 })
    }

    /// Check that every diagonal entry of R is significant.
    ///
    /// `|R_jj|` is the part of column `j` orthogonal to the columns before it,
    /// so it is compared with the norm of column `j` alone. Rescaling a column
    /// does not change the outcome.
    ///
    /// # Errors
    /// Returns `MathError::RankDeficient` naming the first dependent column.
    pub fn check_rank(&self) -> Result<(), MathError> {
        for (j, norm) in self.column_norms.iter().enumerate() {
            let d = self.reduced[[j, j]];
            if !d.is_finite() || !norm.is_finite() || d.abs() <= RANK_TOLERANCE * norm {
                return Err(MathError::RankDeficient { column: j });
            }
        }
        Ok(())
    }

    /// Compute `Q' b`.
    ///
    /// # Errors
    /// Returns `MathError::DimensionMismatch` if `b` does not match the row count.
    pub fn qt_mul(&self, b: &Array1<f64>) -> Result<Array1<f64>, MathError> {
        let n = self.reduced.nrows();
        if b.len() != n {
            return Err(MathError::DimensionMismatch { expected: n, actual: b.len() });
        }

        let mut out = b.to_owned();
        for (j, v) in self.reflectors.iter().enumerate() {
            if let Some(v) = v {
                reflect_vector(v, out.slice_mut(s![j..]));
            }
        }
        Ok(out)
    }

    /// Least squares solution of `x * beta = b`.
    ///
    /// # Errors
    /// Returns `MathError` if `x` is rank deficient or `b` has the wrong length.
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>, MathError> {
        self.check_rank()?;
        let k = self.ncols();
        let qtb = self.qt_mul(b)?;
        Ok(back_substitute(&self.r(), qtb.slice(s![..k])))
    }

    /// Inverse of `X'X`, formed as `R^-1 R^-T`.
    ///
    /// # Errors
    /// Returns `MathError::RankDeficient` if `x` is rank deficient.
    pub fn xtx_inverse(&self) -> Result<Array2<f64>, MathError> {
        self.check_rank()?;
        let r_inv = upper_triangular_inverse(&self.r());
        Ok(r_inv.dot(&r_inv.t()))
    }
}

/// Householder vector mapping `x` onto a multiple of the first unit vector.
fn householder_vector(x: ArrayView1<'_, f64>) -> Option<Array1<f64>> {
    let norm = x.dot(&x).sqrt();
    if norm == 0.0 {
        return None;
    }

    // Reflect away from the sign of x[0] to avoid cancellation.
    let alpha = if x[0] >= 0.0 { -norm } else { norm };
    let mut v = x.to_owned();
    v[0] -= alpha;
    Some(v)
}

fn reflect_columns(v: &Array1<f64>, mut m: ArrayViewMut2<'_, f64>) {
    for col in m.columns_mut() {
        reflect_vector(v, col);
    }
}

fn reflect_vector(v: &Array1<f64>, mut b: ArrayViewMut1<'_, f64>) {
    let vv = v.dot(v);
    if vv == 0.0 {
        return;
    }
    let f = 2.0 * v.dot(&b) / vv;
    b.scaled_add(-f, v);
}

/// Solve `r * x = b` for upper triangular `r`.
fn back_substitute(r: &Array2<f64>, b: ArrayView1<'_, f64>) -> Array1<f64> {
    let k = r.nrows();
    let mut x = Array1::zeros(k);
    for i in (0..k).rev() {
        let mut sum = b[i];
        for j in (i + 1)..k {
            sum -= r[[i, j]] * x[j];
        }
        x[i] = sum / r[[i, i]];
    }
    x
}

/// Invert an upper triangular matrix column by column.
fn upper_triangular_inverse(r: &Array2<f64>) -> Array2<f64> {
    let k = r.nrows();
    let mut inv = Array2::zeros((k, k));
    for c in 0..k {
        let mut e = Array1::zeros(k);
        e[c] = 1.0;
        let col = back_substitute(r, e.view());
        inv.column_mut(c).assign(&col);
    }
    inv
}

/// Perform ordinary least squares regression.
///
/// Solves: argmin_beta sum((y_i - X_i * beta)^2)
///
/// Uses a Householder QR factorization of `x`; the normal equations are never
/// formed.
///
/// # Arguments
/// * `y` - Response vector (n,)
/// * `x` - Design matrix (n x k)
///
/// # Returns
/// OLS fit with coefficients, residuals, R-squared and `(X'X)^-1`.
///
/// # Errors
/// Returns `MathError::Underdetermined` if n <= k, `MathError::RankDeficient`
/// if the columns of `x` are linearly dependent, and
/// `MathError::DimensionMismatch` if `x` and `y` disagree on n.
pub fn ordinary_least_squares(y: &Array1<f64>, x: &Array2<f64>) -> Result<OlsFit, MathError> {
    let n = y.len();
    let k = x.ncols();

    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }
    if n <= k {
        return Err(MathError::Underdetermined { rows: n, cols: k });
    }

    let qr = QrDecomposition::new(x)?;
    let coefficients = qr.solve(y)?;
    let xtx_inv = qr.xtx_inverse()?;

    let fitted = x.dot(&coefficients);
    let residuals = y - &fitted;

    let y_mean = y.mean().unwrap_or(0.0);
    let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r.powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Ok(OlsFit { coefficients, fitted, residuals, r_squared, xtx_inv })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    fn two_factor_design() -> Array2<f64> {
        Array2::from_shape_vec(
            (6, 3),
            vec![
                1.0, 0.5, 1.0, //
                1.0, -1.0, 0.3, //
                1.0, 2.0, -0.7, //
                1.0, 0.1, 0.0, //
                1.0, -0.4, 2.5, //
                1.0, 1.3, -1.2,
            ],
        )
        .unwrap()
    }

    fn assert_matrix_close(a: &Array2<f64>, b: &Array2<f64>, epsilon: f64) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(x, y, epsilon = epsilon);
        }
    }

    #[test]
    fn ols_simple_regression() {
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let x =
            Array2::from_shape_vec((5, 2), vec![1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0, 1.0, 5.0])
                .unwrap();

        let fit = ordinary_least_squares(&y, &x).unwrap();

        // Perfect fit: y = 0 + 1*x
        assert_relative_eq!(fit.coefficients[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn ols_recovers_noiseless_two_factor_model() {
        let x = two_factor_design();
        let y: Array1<f64> = x.rows().into_iter().map(|r| 2.0 + 3.0 * r[1] - r[2]).collect();

        let fit = ordinary_least_squares(&y, &x).unwrap();

        assert_relative_eq!(fit.coefficients[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 3.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[2], -1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-10);
        assert!(fit.residuals.iter().all(|r| r.abs() < 1e-10));
        assert_eq!(fit.nobs(), 6);
        assert_eq!(fit.ncols(), 3);
    }

    #[test]
    fn ols_residuals_are_orthogonal_to_design() {
        let x = two_factor_design();
        let y = array![0.3, -1.2, 2.2, 0.05, 0.9, -0.4];

        let fit = ordinary_least_squares(&y, &x).unwrap();
        let xte = x.t().dot(&fit.residuals);

        assert!(xte.iter().all(|v| v.abs() < 1e-10));
        for (i, yi) in y.iter().enumerate() {
            assert_relative_eq!(fit.fitted[i] + fit.residuals[i], *yi, epsilon = 1e-12);
        }
    }

    #[test]
    fn xtx_inverse_matches_cross_product() {
        let x = two_factor_design();
        let qr = QrDecomposition::new(&x).unwrap();

        let product = x.t().dot(&x).dot(&qr.xtx_inverse().unwrap());

        assert_matrix_close(&product, &Array2::eye(3), 1e-10);
    }

    #[test]
    fn r_is_upper_triangular_and_reproduces_gram_matrix() {
        let x = two_factor_design();
        let r = QrDecomposition::new(&x).unwrap().r();

        assert_eq!(r[[1, 0]], 0.0);
        assert_eq!(r[[2, 1]], 0.0);
        assert_matrix_close(&r.t().dot(&r), &x.t().dot(&x), 1e-10);
    }

    #[test]
    fn underdetermined_system_is_rejected() {
        let y = array![1.0, 2.0];
        let x = Array2::from_shape_vec((2, 3), vec![1.0, 0.1, 0.2, 1.0, 0.3, 0.4]).unwrap();

        let err = ordinary_least_squares(&y, &x).unwrap_err();
        assert!(matches!(err, MathError::Underdetermined { rows: 2, cols: 3 }));
    }

    #[test]
    fn square_system_is_underdetermined() {
        let y = array![1.0, 2.0];
        let x = Array2::from_shape_vec((2, 2), vec![1.0, 0.1, 1.0, 0.3]).unwrap();

        assert!(matches!(
            ordinary_least_squares(&y, &x),
            Err(MathError::Underdetermined { rows: 2, cols: 2 })
        ));
    }

    #[test]
    fn collinear_columns_are_rank_deficient() {
        let mut x = two_factor_design();
        let doubled = x.column(1).mapv(|v| 2.0 * v);
        x.column_mut(2).assign(&doubled);
        let y = array![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];

        let err = ordinary_least_squares(&y, &x).unwrap_err();
        assert!(matches!(err, MathError::RankDeficient { column: 2 }));
    }

    #[test]
    fn rank_check_ignores_column_scale() {
        let mut x = two_factor_design();
        x.column_mut(1).mapv_inplace(|v| v * 1e-8);
        x.column_mut(2).mapv_inplace(|v| v * 1e4);
        let y: Array1<f64> =
            x.rows().into_iter().map(|r| 0.5 + 3e8 * r[1] + 1e-5 * r[2]).collect();

        let fit = ordinary_least_squares(&y, &x).unwrap();

        assert_relative_eq!(fit.coefficients[0], 0.5, max_relative = 1e-8);
        assert_relative_eq!(fit.coefficients[1], 3e8, max_relative = 1e-8);
        assert_relative_eq!(fit.coefficients[2], 1e-5, max_relative = 1e-8);
    }

    #[test]
    fn zero_column_is_rank_deficient() {
        let mut x = two_factor_design();
        x.column_mut(1).fill(0.0);
        let y = array![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];

        assert!(matches!(
            ordinary_least_squares(&y, &x),
            Err(MathError::RankDeficient { column: 1 })
        ));
    }

    #[test]
    fn constant_response_has_zero_r_squared() {
        let x = two_factor_design();
        let y = Array1::from_elem(6, 0.25);

        let fit = ordinary_least_squares(&y, &x).unwrap();

        assert_eq!(fit.r_squared, 0.0);
        assert_relative_eq!(fit.coefficients[0], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn dimension_mismatch() {
        let y = array![1.0, 2.0, 3.0];
        let x = two_factor_design();

        assert!(matches!(
            ordinary_least_squares(&y, &x),
            Err(MathError::DimensionMismatch { expected: 3, actual: 6 })
        ));
    }
}
