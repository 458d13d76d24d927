#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/macrobeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod select;
pub use select::{ColumnSelector, SelectedColumns};

mod align;
pub use align::AlignedSample;

mod design;
pub use design::DesignMatrix;

mod regression;
pub use regression::{HacCovarianceEstimator, OlsEstimator};

mod aggregate;
pub use aggregate::ResultAggregator;

mod betas;
pub use betas::{BetaConfig, BetaEstimator, estimate_betas};

mod error;
pub use error::{ErrorKind, ModelError};

pub use macrobeta_math::PValueDistribution;

/// Re-export commonly used types.
pub mod prelude {
    pub use super::{BetaConfig, BetaEstimator, ModelError, PValueDistribution, estimate_betas};
}
