#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ff5/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dataset;
pub mod dates;
pub mod error;
pub mod frame;
pub mod sample;
pub mod tables;

pub use dataset::{DataPaths, DataSet};
pub use dates::parse_date_label;
pub use error::{DataError, Result};
pub use sample::{RegressionSample, build_sample};
pub use tables::{ExcessReturns, FactorReturns, load_excess_returns, load_factor_returns};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
