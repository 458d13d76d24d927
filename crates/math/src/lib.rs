#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/macrobeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod linalg;
pub use linalg::{OlsFit, QrDecomposition, ordinary_least_squares};

mod hac;
pub use hac::{bartlett_weight, hac_covariance, long_run_covariance, score_matrix, white_covariance};

mod distribution;
pub use distribution::{PValueDistribution, two_sided_p_value};

mod error;
pub use error::MathError;
