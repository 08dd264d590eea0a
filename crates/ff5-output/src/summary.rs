//! Regression diagnostics.
//!
//! Mirrors the usual OLS summary: a coefficient table with standard errors,
//! t statistics, p-values and 95% confidence intervals, followed by the fit
//! statistics of the model.

use ff5_model::{Coefficient, FactorModel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Significance level used for the confidence intervals.
pub const CONFIDENCE_ALPHA: f64 = 0.05;

/// Coefficient table and fit statistics for one stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegressionSummary {
    /// Stock symbol.
    pub symbol: String,

    /// First date label of the sample.
    pub sample_start: String,

    /// Last date label of the sample.
    pub sample_end: String,

    /// Number of observations.
    pub nobs: usize,

    /// Model degrees of freedom (regressors excluding the intercept).
    pub df_model: f64,

    /// Residual degrees of freedom.
    pub df_resid: f64,

    /// R-squared.
    pub r_squared: f64,

    /// Adjusted R-squared.
    pub adj_r_squared: f64,

    /// F statistic of the regression.
    pub f_statistic: f64,

    /// p-value of the F statistic.
    pub f_p_value: f64,

    /// Gaussian log-likelihood.
    pub log_likelihood: f64,

    /// Akaike information criterion.
    pub aic: f64,

    /// Bayesian information criterion.
    pub bic: f64,

    /// Durbin-Watson statistic of the residuals.
    pub durbin_watson: f64,

    /// Standard deviation of the residuals.
    pub residual_std_error: f64,

    /// One row per regression term, intercept first.
    pub coefficients: Vec<Coefficient>,
}

impl RegressionSummary {
    /// Summarise a fitted model.
    pub fn from_model(model: &FactorModel) -> Self {
        let ols = model.ols();
        let dates = model.dates();

        Self {
            symbol: model.symbol().to_string(),
            sample_start: dates.first().cloned().unwrap_or_default(),
            sample_end: dates.last().cloned().unwrap_or_default(),
            nobs: ols.nobs(),
            df_model: ols.df_model(),
            df_resid: ols.df_resid(),
            r_squared: ols.r_squared(),
            adj_r_squared: ols.adj_r_squared(),
            f_statistic: ols.f_statistic(),
            f_p_value: ols.f_p_value(),
            log_likelihood: ols.log_likelihood(),
            aic: ols.aic(),
            bic: ols.bic(),
            durbin_watson: ols.durbin_watson(),
            residual_std_error: ols.residual_std_error(),
            coefficients: ols.coefficients(CONFIDENCE_ALPHA),
        }
    }

    /// Coefficient row for `term`.
    pub fn coefficient(&self, term: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == term)
    }

    /// Terms significant at `level`.
    pub fn significant_terms(&self, level: f64) -> Vec<&str> {
        self.coefficients
            .iter()
            .filter(|c| c.p_value < level)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Format as an ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nOLS Regression Results: {}\n", self.symbol));
        output.push_str(&format!(
            "Sample: {} to {}\n",
            self.sample_start, self.sample_end
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!(
            "{:<20} {:>12}   {:<20} {:>12}\n",
            "Observations:", self.nobs, "R-squared:", format!("{:.4}", self.r_squared)
        ));
        output.push_str(&format!(
            "{:<20} {:>12}   {:<20} {:>12}\n",
            "Df Residuals:",
            self.df_resid,
            "Adj. R-squared:",
            format!("{:.4}", self.adj_r_squared)
        ));
        output.push_str(&format!(
            "{:<20} {:>12}   {:<20} {:>12}\n",
            "Df Model:",
            self.df_model,
            "F-statistic:",
            format!("{:.4}", self.f_statistic)
        ));
        output.push_str(&format!(
            "{:<20} {:>12}   {:<20} {:>12}\n",
            "Log-Likelihood:",
            format!("{:.2}", self.log_likelihood),
            "Prob (F-statistic):",
            format!("{:.4e}", self.f_p_value)
        ));
        output.push_str(&format!(
            "{:<20} {:>12}   {:<20} {:>12}\n",
            "AIC:",
            format!("{:.2}", self.aic),
            "BIC:",
            format!("{:.2}", self.bic)
        ));

        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>10} {:>10} {:>9} {:>9} {:>12} {:>12}\n",
            "", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for c in &self.coefficients {
            output.push_str(&format!(
                "{:<10} {:>10.6} {:>10.6} {:>9.3} {:>9.3} {:>12.6} {:>12.6}\n",
                c.name, c.estimate, c.std_error, c.t_value, c.p_value, c.ci_lower, c.ci_upper
            ));
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>12}   {:<20} {:>12}\n",
            "Durbin-Watson:",
            format!("{:.3}", self.durbin_watson),
            "Resid. Std. Err.:",
            format!("{:.6}", self.residual_std_error)
        ));

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Regression Summary: {}\n\n", self.symbol));
        output.push_str(&format!(
            "**Sample:** {} to {} ({} observations)\n\n",
            self.sample_start, self.sample_end, self.nobs
        ));

        output.push_str("## Fit\n\n");
        output.push_str(&format!("- **R-squared:** {:.4}\n", self.r_squared));
        output.push_str(&format!(
            "- **Adj. R-squared:** {:.4}\n",
            self.adj_r_squared
        ));
        output.push_str(&format!(
            "- **F-statistic:** {:.4} (p = {:.4e})\n",
            self.f_statistic, self.f_p_value
        ));
        output.push_str(&format!(
            "- **Log-Likelihood:** {:.2} (AIC {:.2}, BIC {:.2})\n",
            self.log_likelihood, self.aic, self.bic
        ));
        output.push_str(&format!(
            "- **Durbin-Watson:** {:.3}\n\n",
            self.durbin_watson
        ));

        output.push_str("## Coefficients\n\n");
        output.push_str("| Term | coef | std err | t | P>\\|t\\| | [0.025 | 0.975] |\n");
        output.push_str("|------|-----:|--------:|--:|-------:|-------:|-------:|\n");
        for c in &self.coefficients {
            output.push_str(&format!(
                "| {} | {:.6} | {:.6} | {:.3} | {:.3} | {:.6} | {:.6} |\n",
                c.name, c.estimate, c.std_error, c.t_value, c.p_value, c.ci_lower, c.ci_upper
            ));
        }

        output
    }
}

impl fmt::Display for RegressionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: R-squared {:.4} over {} observations",
            self.symbol, self.r_squared, self.nobs
        )
    }
}
