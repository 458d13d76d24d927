#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/macrobeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod asset;
pub use asset::Asset;

mod factor;
pub use factor::{CONST_PARAMETER, Factor, Parameter};

mod instrument;
pub use instrument::{ChangeKind, Instrument};

mod table;
pub use table::{ChangesTable, DATE_COLUMN, PriceTable};

mod result;
pub use result::{RegressionResult, ResultTable};

mod error;
pub use error::TableError;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
