//! Tail probabilities of test statistics.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::MathError;

/// Reference distribution of t-statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PValueDistribution {
    /// Standard normal (asymptotic inference).
    #[default]
    Normal,
    /// Student-t with n - k degrees of freedom.
    StudentT,
}

/// Two-sided p-value of `t`.
///
/// `df` is only used by [`PValueDistribution::StudentT`]. A NaN statistic
/// yields a NaN p-value; an infinite one yields zero.
///
/// # Errors
/// Returns `MathError::Distribution` if the Student-t degrees of freedom are zero.
pub fn two_sided_p_value(
    t: f64,
    distribution: PValueDistribution,
    df: usize,
) -> Result<f64, MathError> {
    if t.is_nan() {
        return Ok(f64::NAN);
    }

    let tail = match distribution {
        PValueDistribution::Normal => Normal::new(0.0, 1.0)
            .map_err(|e| MathError::Distribution(e.to_string()))?
            .sf(t.abs()),
        PValueDistribution::StudentT => StudentsT::new(0.0, 1.0, df as f64)
            .map_err(|e| MathError::Distribution(e.to_string()))?
            .sf(t.abs()),
    };

    Ok((2.0 * tail).min(1.0))
}
