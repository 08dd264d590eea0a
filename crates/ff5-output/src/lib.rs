#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ff5/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{CoefficientExport, ExportError, ExportFormat, Exporter, FittedPointExport};
pub use report::{
    PredictionReport, ReportBuilder, ReportError, excess_return_line, format_excess_return,
};
pub use summary::RegressionSummary;
