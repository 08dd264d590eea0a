#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ff5/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod distribution;
pub mod error;
pub mod factor;
pub mod inputs;
pub mod linalg;
pub mod model;
pub mod ols;

pub use error::{ModelError, Result};
pub use factor::{Factor, RISK_FREE_COLUMN};
pub use inputs::{FactorInputs, InputBounds, format_input};
pub use model::{
    ALPHA_TERM, EQUATION, FactorLoadings, FactorModel, FittedPoint, TITLE, TermContribution,
};
pub use ols::{Coefficient, OlsFit};
