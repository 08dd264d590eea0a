//! Prediction reports.

use chrono::{DateTime, Utc};
use ff5_model::{
    EQUATION, FactorInputs, FactorLoadings, FactorModel, TITLE, TermContribution, format_input,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required builder field was not set.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// Format an excess return as a percentage rounded to four decimals.
///
/// Rounding is decided on the exact binary value of `excess_return * 100`.
/// Trailing zeros are dropped, but a whole number keeps one decimal place,
/// so `0.01` renders as `1.0%` and `0.0079` as `0.79%`.
pub fn format_excess_return(excess_return: f64) -> String {
    let pct = excess_return * 100.0;
    if !pct.is_finite() {
        return format!("{}%", pct);
    }

    let mut text = format!("{:.4}", pct);
    let trimmed = text.trim_end_matches('0').len();
    text.truncate(trimmed);
    if text.ends_with('.') {
        text.push('0');
    }
    format!("{}%", text)
}

/// The headline line shown above the charts.
pub fn excess_return_line(excess_return: f64) -> String {
    format!("R_it - R_ft = {}", format_excess_return(excess_return))
}

/// A single prediction with the inputs and fit that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Stock symbol.
    pub symbol: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// First date label of the regression sample.
    pub sample_start: String,

    /// Last date label of the regression sample.
    pub sample_end: String,

    /// Number of observations in the fit.
    pub nobs: usize,

    /// In-sample R-squared.
    pub r_squared: f64,

    /// Factor values the prediction was made for.
    pub inputs: FactorInputs,

    /// Fitted intercept and loadings.
    pub loadings: FactorLoadings,

    /// Per-term breakdown of the prediction.
    pub contributions: Vec<TermContribution>,

    /// Predicted excess return.
    pub excess_return: f64,

    /// Predicted excess return as displayed.
    pub excess_return_pct: String,
}

impl PredictionReport {
    /// Create a report for `inputs` against a fitted model.
    pub fn new(model: &FactorModel, inputs: FactorInputs) -> Self {
        let excess_return = model.predict(&inputs);
        let dates = model.dates();

        Self {
            symbol: model.symbol().to_string(),
            timestamp: Utc::now(),
            sample_start: dates.first().cloned().unwrap_or_default(),
            sample_end: dates.last().cloned().unwrap_or_default(),
            nobs: model.ols().nobs(),
            r_squared: model.ols().r_squared(),
            inputs,
            loadings: model.loadings(),
            contributions: model.contributions(&inputs),
            excess_return,
            excess_return_pct: format_excess_return(excess_return),
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendering with the term breakdown.
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}: {}\n", TITLE, self.symbol));
        output.push_str(&format!("{}\n", EQUATION));
        output.push_str(&format!(
            "Sample: {} to {} ({} observations, R-squared {:.4})\n",
            self.sample_start, self.sample_end, self.nobs, self.r_squared
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!(
            "{:<20} {:>14} {:>14} {:>14}\n",
            "Term", "Coefficient", "Input", "Contribution"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for term in &self.contributions {
            output.push_str(&format!(
                "{:<20} {:>14.6} {:>14} {:>14.6}\n",
                term.term,
                term.coefficient,
                format_input(term.input),
                term.contribution
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!("{}\n", excess_return_line(self.excess_return)));

        output
    }
}

/// Builder for creating prediction reports.
#[derive(Debug, Default)]
pub struct ReportBuilder<'a> {
    model: Option<&'a FactorModel>,
    inputs: Option<FactorInputs>,
}

impl<'a> ReportBuilder<'a> {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fitted model.
    pub const fn model(mut self, model: &'a FactorModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the factor inputs. Defaults apply when unset.
    pub const fn inputs(mut self, inputs: FactorInputs) -> Self {
        self.inputs = Some(inputs);
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<PredictionReport, ReportError> {
        let model = self.model.ok_or(ReportError::MissingField("model"))?;
        Ok(PredictionReport::new(
            model,
            self.inputs.unwrap_or_default(),
        ))
    }
}
