//! # macrobeta
//!
//! Sensitivities of equity indices and sector ETFs to macro factor changes,
//! with heteroskedasticity and autocorrelation consistent standard errors.
//!
//! This crate provides a unified interface to the macrobeta crates.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Closed schema, tables and result types
//! - `traits`: Data source and transformation seams
//! - `math`: QR least squares, HAC covariance, p-values
//! - `model`: Beta estimation
//! - `utils`: Price to change conversion
//! - `data`: Yahoo Finance price source
//! - `cli`: The `betas` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use macrobeta::{data::YahooSource, model::estimate_betas, utils::build_changes};
//!
//! let prices = YahooSource::new(Default::default())?.fetch_configured().await?;
//! let table = estimate_betas(&build_changes(&prices)?, 5)?;
//! println!("{table}");
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use macrobeta_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use macrobeta_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use macrobeta_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use macrobeta_model as model;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use macrobeta_utils as utils;
#[cfg(feature = "data")]
#[doc(inline)]
pub use macrobeta_data as data;
