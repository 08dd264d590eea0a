//! Fama-French five-factor regression for a single stock.
//!
//! Regresses a stock's excess returns on the five factor series with an
//! intercept (`Alpha`), then predicts the excess return for user-supplied
//! factor values as `alpha + sum(beta_k * input_k)`.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{Factor, FactorInputs, ModelError, OlsFit, Result};

/// Name of the intercept term.
pub const ALPHA_TERM: &str = "Alpha";

/// Display title of the model.
pub const TITLE: &str = "Fama-French 5 Factor Model";

/// The regression equation in plain text.
pub const EQUATION: &str = "R_it - R_ft = a_i + b_i(R_Mt - R_ft) + s_i SMB_t + h_i HML_t + r_i RMW_t + c_i CMA_t + e_it";

/// Fitted intercept and factor loadings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorLoadings {
    /// Intercept
    pub alpha: f64,
    /// Loadings in canonical factor order
    pub betas: [f64; 5],
}

impl FactorLoadings {
    /// Loading on `factor`.
    pub const fn beta(&self, factor: Factor) -> f64 {
        self.betas[factor.index()]
    }
}

/// Contribution of one regression term to a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermContribution {
    /// Term name (`Alpha` or a factor column)
    pub term: String,
    /// Fitted coefficient
    pub coefficient: f64,
    /// Input value (1 for the intercept)
    pub input: f64,
    /// `coefficient * input`
    pub contribution: f64,
}

/// One observation of the fitted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPoint {
    /// Date label as it appears in the input files
    pub date: String,
    /// Observed excess return
    pub actual: f64,
    /// Model-implied excess return
    pub fitted: f64,
}

/// Prepend a column of ones to `factors`.
pub fn with_intercept(factors: &Array2<f64>) -> Array2<f64> {
    let (n, k) = factors.dim();
    let mut design = Array2::<f64>::ones((n, k + 1));
    for (j, column) in factors.columns().into_iter().enumerate() {
        design.column_mut(j + 1).assign(&column);
    }
    design
}

/// Regression term names: `Alpha` followed by the factor columns.
pub fn term_names() -> Vec<String> {
    std::iter::once(ALPHA_TERM)
        .chain(Factor::ALL.iter().map(Factor::column))
        .map(String::from)
        .collect()
}

/// A five-factor regression fitted for one stock.
#[derive(Debug, Clone)]
pub struct FactorModel {
    symbol: String,
    dates: Vec<String>,
    dependent: Array1<f64>,
    ols: OlsFit,
}

impl FactorModel {
    /// Fit the model.
    ///
    /// # Arguments
    /// * `symbol` - Stock the excess returns belong to
    /// * `dates` - Date label of each observation
    /// * `dependent` - Excess returns of the stock
    /// * `factors` - Factor returns, one column per factor in [`Factor::ALL`] order
    pub fn fit(
        symbol: impl Into<String>,
        dates: Vec<String>,
        dependent: &Array1<f64>,
        factors: &Array2<f64>,
    ) -> Result<Self> {
        let symbol = symbol.into();

        if factors.ncols() != Factor::ALL.len() {
            return Err(ModelError::DimensionMismatch {
                expected: Factor::ALL.len(),
                actual: factors.ncols(),
            });
        }
        if dates.len() != dependent.len() {
            return Err(ModelError::DimensionMismatch {
                expected: dependent.len(),
                actual: dates.len(),
            });
        }

        let design = with_intercept(factors);
        let ols = OlsFit::fit(&design, dependent, term_names())?;

        tracing::debug!(
            symbol = %symbol,
            nobs = ols.nobs(),
            r_squared = ols.r_squared(),
            "fitted five-factor regression"
        );

        Ok(Self {
            symbol,
            dates,
            dependent: dependent.clone(),
            ols,
        })
    }

    /// Stock symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Date labels of the sample.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Underlying regression.
    pub const fn ols(&self) -> &OlsFit {
        &self.ols
    }

    /// Intercept and loadings.
    pub fn loadings(&self) -> FactorLoadings {
        let params = self.ols.params();
        let mut betas = [0.0; 5];
        for (i, beta) in betas.iter_mut().enumerate() {
            *beta = params[i + 1];
        }
        FactorLoadings {
            alpha: params[0],
            betas,
        }
    }

    /// Predicted excess return for `inputs`.
    pub fn predict(&self, inputs: &FactorInputs) -> f64 {
        let loadings = self.loadings();
        loadings.alpha
            + loadings
                .betas
                .iter()
                .zip(inputs.values())
                .map(|(beta, x)| beta * x)
                .sum::<f64>()
    }

    /// Per-term breakdown of [`FactorModel::predict`]. The contributions sum
    /// to the prediction.
    pub fn contributions(&self, inputs: &FactorInputs) -> Vec<TermContribution> {
        let loadings = self.loadings();
        let mut terms = Vec::with_capacity(Factor::ALL.len() + 1);

        terms.push(TermContribution {
            term: ALPHA_TERM.to_string(),
            coefficient: loadings.alpha,
            input: 1.0,
            contribution: loadings.alpha,
        });

        for factor in Factor::ALL {
            let coefficient = loadings.beta(factor);
            let input = inputs.get(factor);
            terms.push(TermContribution {
                term: factor.column().to_string(),
                coefficient,
                input,
                contribution: coefficient * input,
            });
        }

        terms
    }

    /// Observed and fitted excess returns over the sample.
    pub fn fitted_series(&self) -> Vec<FittedPoint> {
        self.dates
            .iter()
            .zip(self.dependent.iter())
            .zip(self.ols.fitted().iter())
            .map(|((date, &actual), &fitted)| FittedPoint {
                date: date.clone(),
                actual,
                fitted,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Deterministic factor panel with known loadings and small noise.
    fn synthetic(n: usize) -> (Vec<String>, Array1<f64>, Array2<f64>) {
        let mut factors = Array2::<f64>::zeros((n, 5));
        let mut y = Array1::<f64>::zeros(n);
        let betas = [1.1, 0.4, -0.3, 0.2, 0.5];

        for t in 0..n {
            let tf = t as f64;
            factors[[t, 0]] = 0.02 * (tf * 0.7).sin();
            factors[[t, 1]] = 0.01 * (tf * 1.3).cos();
            factors[[t, 2]] = 0.015 * (tf * 0.4).sin();
            factors[[t, 3]] = 0.008 * (tf * 2.1).cos();
            factors[[t, 4]] = 0.012 * (tf * 0.9 + 1.0).sin();

            let noise = 0.0005 * (tf * 3.7).sin();
            y[t] = 0.001
                + (0..5).map(|k| betas[k] * factors[[t, k]]).sum::<f64>()
                + noise;
        }

        let dates = (0..n).map(|t| format!("2020-{:02}", t % 12 + 1)).collect();
        (dates, y, factors)
    }

    #[test]
    fn test_with_intercept() {
        let x = ndarray::array![[2.0, 3.0], [4.0, 5.0]];
        let design = with_intercept(&x);
        assert_eq!(design.dim(), (2, 3));
        assert_eq!(design.column(0).to_vec(), vec![1.0, 1.0]);
        assert_eq!(design[[1, 2]], 5.0);
    }

    #[test]
    fn test_term_names() {
        assert_eq!(
            term_names(),
            vec!["Alpha", "Mkt-RF", "SMB", "HML", "RMW", "CMA"]
        );
    }

    #[test]
    fn test_recovers_loadings() {
        let (dates, y, x) = synthetic(120);
        let model = FactorModel::fit("TEST", dates, &y, &x).unwrap();
        let loadings = model.loadings();

        assert_abs_diff_eq!(loadings.alpha, 0.001, epsilon = 1e-3);
        assert_abs_diff_eq!(loadings.beta(Factor::MarketExcess), 1.1, epsilon = 0.05);
        assert_abs_diff_eq!(loadings.beta(Factor::Hml), -0.3, epsilon = 0.05);
        assert_eq!(model.symbol(), "TEST");
        assert_eq!(model.ols().nobs(), 120);
    }

    #[test]
    fn test_predict_is_dot_product() {
        let (dates, y, x) = synthetic(60);
        let model = FactorModel::fit("TEST", dates, &y, &x).unwrap();
        let inputs = FactorInputs::default();
        let params = model.ols().params();

        let expected = params[0]
            + params[1] * inputs.market_excess
            + params[2] * inputs.smb
            + params[3] * inputs.hml
            + params[4] * inputs.rmw
            + params[5] * inputs.cma;
        assert_abs_diff_eq!(model.predict(&inputs), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_zero_inputs_predict_alpha() {
        let (dates, y, x) = synthetic(60);
        let model = FactorModel::fit("TEST", dates, &y, &x).unwrap();
        let zero = FactorInputs::from_values([0.0; 5]);
        assert_eq!(model.predict(&zero), model.loadings().alpha);
    }

    #[test]
    fn test_contributions_sum_to_prediction() {
        let (dates, y, x) = synthetic(60);
        let model = FactorModel::fit("TEST", dates, &y, &x).unwrap();
        let inputs = FactorInputs::from_values([0.01, -0.02, 0.03, 0.0, 0.005]);

        let terms = model.contributions(&inputs);
        assert_eq!(terms.len(), 6);
        assert_eq!(terms[0].term, ALPHA_TERM);
        assert_eq!(terms[0].input, 1.0);

        let total: f64 = terms.iter().map(|t| t.contribution).sum();
        assert_abs_diff_eq!(total, model.predict(&inputs), epsilon = 1e-15);
    }

    #[test]
    fn test_fitted_series() {
        let (dates, y, x) = synthetic(30);
        let model = FactorModel::fit("TEST", dates.clone(), &y, &x).unwrap();
        let series = model.fitted_series();

        assert_eq!(series.len(), 30);
        assert_eq!(series[0].date, dates[0]);
        assert_eq!(series[4].actual, y[4]);
        let residual = series[4].actual - series[4].fitted;
        assert_abs_diff_eq!(residual, model.ols().residuals()[4], epsilon = 1e-15);
    }

    #[test]
    fn test_rejects_wrong_factor_count() {
        let (dates, y, _) = synthetic(30);
        let x = Array2::<f64>::zeros((30, 4));
        assert!(matches!(
            FactorModel::fit("TEST", dates, &y, &x),
            Err(ModelError::DimensionMismatch {
                expected: 5,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_rejects_mismatched_dates() {
        let (mut dates, y, x) = synthetic(30);
        dates.pop();
        assert!(FactorModel::fit("TEST", dates, &y, &x).is_err());
    }

    #[test]
    fn test_six_observations_fit_exactly() {
        let (dates, y, x) = synthetic(6);
        let model = FactorModel::fit("TEST", dates, &y, &x).unwrap();

        assert_eq!(model.ols().nobs(), 6);
        assert_eq!(model.ols().df_resid(), 0.0);
        for point in model.fitted_series() {
            assert_abs_diff_eq!(point.fitted, point.actual, epsilon = 1e-8);
        }
        assert!(model.predict(&FactorInputs::default()).is_finite());
        assert!(model.ols().std_errors()[0].is_nan());
    }

    #[test]
    fn test_too_few_observations() {
        let (dates, y, x) = synthetic(5);
        assert!(matches!(
            FactorModel::fit("TEST", dates, &y, &x),
            Err(ModelError::InsufficientData {
                required: 6,
                actual: 5
            })
        ));
    }
}
