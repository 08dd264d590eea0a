//! CSV and JSON export of fitted models.

use ff5_model::{FactorModel, OlsFit};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::summary::CONFIDENCE_ALPHA;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One regression term of a fitted model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoefficientExport {
    /// Stock symbol.
    pub symbol: String,

    /// Term name.
    pub term: String,

    /// Estimated coefficient.
    pub estimate: f64,

    /// Standard error.
    pub std_error: f64,

    /// t statistic.
    pub t_value: f64,

    /// Two-sided p-value.
    pub p_value: f64,

    /// Lower 95% confidence bound.
    pub ci_lower: f64,

    /// Upper 95% confidence bound.
    pub ci_upper: f64,
}

impl CoefficientExport {
    /// All terms of `model`, intercept first.
    pub fn from_model(model: &FactorModel) -> Vec<Self> {
        Self::from_fit(model.symbol(), model.ols())
    }

    fn from_fit(symbol: &str, ols: &OlsFit) -> Vec<Self> {
        ols.coefficients(CONFIDENCE_ALPHA)
            .into_iter()
            .map(|c| Self {
                symbol: symbol.to_string(),
                term: c.name,
                estimate: c.estimate,
                std_error: c.std_error,
                t_value: c.t_value,
                p_value: c.p_value,
                ci_lower: c.ci_lower,
                ci_upper: c.ci_upper,
            })
            .collect()
    }
}

/// One observation of the in-sample fit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittedPointExport {
    /// Date label.
    pub date: String,

    /// Observed excess return.
    pub actual: f64,

    /// Fitted excess return.
    pub fitted: f64,

    /// `actual - fitted`.
    pub residual: f64,
}

impl FittedPointExport {
    /// The fitted series of `model` in sample order.
    pub fn from_model(model: &FactorModel) -> Vec<Self> {
        model
            .fitted_series()
            .into_iter()
            .map(|p| Self {
                residual: p.actual - p.fitted,
                date: p.date,
                actual: p.actual,
                fitted: p.fitted,
            })
            .collect()
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Serialize `records` in `format`, one CSV row per record.
fn export_records<T: Serialize>(records: &[T], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            for record in records {
                wtr.serialize(record)?;
            }
            let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
            String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
        }
        ExportFormat::Json => Ok(serde_json::to_string(records)?),
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(records)?),
    }
}

impl Exporter for Vec<CoefficientExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_records(self, format)
    }
}

impl Exporter for Vec<FittedPointExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_records(self, format)
    }
}
