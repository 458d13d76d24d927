#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/macrobeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{DEFAULT_LOOKBACK_DAYS, DEFAULT_RATE_LIMIT, FetchConfig, TickerOverride};

mod yahoo;
pub use yahoo::YahooSource;

mod error;
pub use error::DataError;
