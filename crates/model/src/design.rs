//! Design matrix with a leading intercept.

use macrobeta_math::MathError;
use macrobeta_primitives::Parameter;
use ndarray::{Array2, Axis, concatenate};

use crate::{AlignedSample, ModelError};

/// Regressors of one asset: a column of ones followed by the factor columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    matrix: Array2<f64>,
    parameters: Vec<Parameter>,
}

impl DesignMatrix {
    /// Prepend the intercept to the sample's factor columns.
    ///
    /// A factor column with a single nonzero value on every date is collinear
    /// with the intercept and rejected. An all-zero column is left for the rank
    /// check to report. Samples with no more rows than columns skip the check
    /// so the estimator reports them as too short.
    ///
    /// # Errors
    /// Returns `ModelError::DegenerateDesign` for a constant factor column.
    pub fn build(sample: &AlignedSample) -> Result<Self, ModelError> {
        let regressors = sample.regressors();
        let overdetermined = sample.nobs() > sample.factors().len() + 1;
        if let Some(factor) = sample
            .factors()
            .iter()
            .zip(regressors.columns())
            .filter(|_| overdetermined)
            .find_map(|(factor, column)| is_constant(column.iter().copied()).then_some(factor))
        {
            return Err(ModelError::DegenerateDesign {
                asset: sample.asset(),
                column: factor.to_string(),
            });
        }

        let ones = Array2::ones((sample.nobs(), 1));
        let matrix = concatenate(Axis(1), &[ones.view(), regressors.view()])
            .map_err(|_| MathError::DimensionMismatch {
                expected: sample.nobs(),
                actual: regressors.nrows(),
            })?;

        let parameters = std::iter::once(Parameter::Const)
            .chain(sample.factors().iter().copied().map(Parameter::from))
            .collect();

        Ok(Self { matrix, parameters })
    }

    /// The n x k matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Parameter of each column, `const` first.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Number of rows.
    #[must_use]
    pub fn nobs(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of columns, intercept included.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    let Some(first) = values.next() else { return false };
    first != 0.0 && values.all(|v| v == first)
}
