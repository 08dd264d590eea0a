//! Regression sample alignment.

use ff5_model::Factor;
use ndarray::{Array1, Array2};

use crate::{DataError, ExcessReturns, FactorReturns, Result};

/// Dependent and factor observations for one stock, aligned on date.
#[derive(Debug, Clone)]
pub struct RegressionSample {
    /// Stock symbol
    pub symbol: String,
    /// Date label of each observation
    pub dates: Vec<String>,
    /// Excess returns of the stock
    pub dependent: Array1<f64>,
    /// Factor returns, one column per factor in canonical order
    pub factors: Array2<f64>,
}

impl RegressionSample {
    /// Number of observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the sample has no observations.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Build the regression sample for `symbol`.
///
/// Periods where the stock has no excess return are dropped. Every remaining
/// period must have a complete factor row.
///
/// # Errors
/// * [`DataError::UnknownSymbol`] if `symbol` has no column
/// * [`DataError::MissingData`] if a kept period has no factor row, a factor
///   value is missing, or no period is left
pub fn build_sample(
    symbol: &str,
    returns: &ExcessReturns,
    factors: &FactorReturns,
) -> Result<RegressionSample> {
    let series = returns.series(symbol)?;
    let missing = |reason: String| DataError::MissingData {
        symbol: symbol.to_string(),
        reason,
    };

    let mut dates = Vec::new();
    let mut dependent = Vec::new();
    let mut rows: Vec<[f64; 5]> = Vec::new();

    for (date, value) in returns.dates().iter().zip(series) {
        let Some(value) = value else {
            continue;
        };

        let row = factors
            .row(date)
            .ok_or_else(|| missing(format!("no factor returns for {date}")))?;

        let mut values = [0.0; 5];
        for factor in Factor::ALL {
            values[factor.index()] = factors
                .value(row, factor)
                .ok_or_else(|| missing(format!("{factor} is missing for {date}")))?;
        }

        dates.push(date.clone());
        dependent.push(*value);
        rows.push(values);
    }

    if dates.is_empty() {
        return Err(missing("no periods with a return".to_string()));
    }

    let dropped = series.len() - dates.len();
    tracing::debug!(
        symbol,
        observations = dates.len(),
        dropped,
        "built regression sample"
    );

    let factors = Array2::from_shape_fn((rows.len(), Factor::ALL.len()), |(i, j)| rows[i][j]);

    Ok(RegressionSample {
        symbol: symbol.to_string(),
        dates,
        dependent: Array1::from(dependent),
        factors,
    })
}
