//! Error types for beta estimation.

use macrobeta_math::MathError;
use macrobeta_primitives::{Asset, TableError};

/// Broad class of a [`ModelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input table does not carry what the estimator needs.
    Configuration,
    /// An asset's regression is not identifiable.
    Model,
    /// A caller-supplied parameter is out of range.
    Parameter,
    /// A failure below the estimator's own checks.
    Internal,
}

/// Errors that can occur during beta estimation.
///
/// Every variant aborts the whole estimation; no partial results are returned.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// None of the known asset columns is present.
    #[error("no known asset columns in changes table")]
    NoAssetColumns,

    /// None of the known factor columns is present.
    #[error("no known factor columns in changes table")]
    NoFactorColumns,

    /// A requested column is absent from the changes table.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A factor column duplicates the intercept.
    #[error("degenerate design for {asset}: column {column} is constant")]
    DegenerateDesign {
        /// Regressed asset.
        asset: Asset,
        /// Offending factor column.
        column: String,
    },

    /// The design matrix does not have full column rank.
    #[error("singular design for {asset}")]
    SingularDesign {
        /// Regressed asset.
        asset: Asset,
    },

    /// Not more observations than regressors.
    #[error("insufficient observations for {asset}: {nobs} rows for {columns} columns")]
    InsufficientObservations {
        /// Regressed asset.
        asset: Asset,
        /// Aligned observations.
        nobs: usize,
        /// Design matrix columns, intercept included.
        columns: usize,
    },

    /// Truncation lag is negative or not smaller than the sample.
    #[error("invalid lag {maxlags} for {nobs} observations")]
    InvalidLag {
        /// Requested truncation lag.
        maxlags: i64,
        /// Observations of the regression it was applied to.
        nobs: usize,
    },

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Table error.
    #[error("table error: {0}")]
    Table(#[from] TableError),
}

impl ModelError {
    /// Class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoAssetColumns | Self::NoFactorColumns | Self::MissingColumn(_) => {
                ErrorKind::Configuration
            }
            Self::DegenerateDesign { .. }
            | Self::SingularDesign { .. }
            | Self::InsufficientObservations { .. } => ErrorKind::Model,
            Self::InvalidLag { .. } => ErrorKind::Parameter,
            Self::Math(_) | Self::Table(_) => ErrorKind::Internal,
        }
    }

    /// Returns whether the input table lacks required columns.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.kind(), ErrorKind::Configuration)
    }
}
