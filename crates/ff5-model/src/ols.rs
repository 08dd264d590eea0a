//! Ordinary least squares regression.
//!
//! Solves the normal equations `(X'X) b = X'y` through a Cholesky
//! factorisation and derives the standard inference statistics from the
//! residuals. The design matrix is used as given: callers add the intercept
//! column themselves.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::distribution::{f_survival, student_t_quantile, student_t_two_sided_p};
use crate::linalg::{cholesky, cholesky_inverse, cholesky_solve};
use crate::{ModelError, Result};

/// A fitted OLS regression.
#[derive(Debug, Clone)]
pub struct OlsFit {
    names: Vec<String>,
    params: Array1<f64>,
    std_errors: Array1<f64>,
    fitted: Array1<f64>,
    residuals: Array1<f64>,
    nobs: usize,
    has_constant: bool,
    ssr: f64,
    tss: f64,
}

/// One row of a coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Regressor name
    pub name: String,
    /// Estimated coefficient
    pub estimate: f64,
    /// Standard error of the estimate
    pub std_error: f64,
    /// t statistic
    pub t_value: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Lower bound of the confidence interval
    pub ci_lower: f64,
    /// Upper bound of the confidence interval
    pub ci_upper: f64,
}

/// Whether column `j` holds the same non-zero value in every row.
fn is_constant_column(x: &Array2<f64>, j: usize) -> bool {
    let column = x.column(j);
    match column.first() {
        Some(&first) if first != 0.0 => column.iter().all(|&v| v == first),
        _ => false,
    }
}

impl OlsFit {
    /// Fit `y = X b + e` by least squares.
    ///
    /// # Arguments
    /// * `x` - Design matrix (observations x regressors), intercept included
    /// * `y` - Dependent variable
    /// * `names` - One name per column of `x`
    ///
    /// # Errors
    /// * [`ModelError::DimensionMismatch`] if the shapes disagree
    /// * [`ModelError::InsufficientData`] if there are fewer observations than regressors
    ///
    /// An exactly identified fit (as many observations as regressors) has no
    /// residual degrees of freedom; its coefficients are returned but the
    /// dispersion statistics are NaN.
    /// * [`ModelError::NonFinite`] if any input is NaN or infinite
    /// * [`ModelError::Singular`] if the regressors are collinear
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, names: Vec<String>) -> Result<Self> {
        let (nobs, k) = x.dim();

        if y.len() != nobs {
            return Err(ModelError::DimensionMismatch {
                expected: nobs,
                actual: y.len(),
            });
        }
        if names.len() != k {
            return Err(ModelError::DimensionMismatch {
                expected: k,
                actual: names.len(),
            });
        }
        if k == 0 || nobs < k {
            return Err(ModelError::InsufficientData {
                required: k.max(1),
                actual: nobs,
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite("design matrix".to_string()));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite("dependent variable".to_string()));
        }

        let xtx = x.t().dot(x);
        let xty = x.t().dot(y);
        let lower = cholesky(&xtx)?;
        let params = cholesky_solve(&lower, &xty)?;

        let fitted = x.dot(&params);
        let residuals = y - &fitted;
        let ssr = residuals.dot(&residuals);

        let xtx_inv = cholesky_inverse(&lower)?;
        let std_errors = if nobs == k {
            Array1::from_elem(k, f64::NAN)
        } else {
            let sigma2 = ssr / (nobs - k) as f64;
            xtx_inv.diag().mapv(|v| (sigma2 * v).max(0.0).sqrt())
        };

        let has_constant = (0..k).any(|j| is_constant_column(x, j));
        let tss = if has_constant {
            let mean = y.mean().unwrap_or(0.0);
            y.iter().map(|v| (v - mean).powi(2)).sum()
        } else {
            y.dot(y)
        };

        Ok(Self {
            names,
            params,
            std_errors,
            fitted,
            residuals,
            nobs,
            has_constant,
            ssr,
            tss,
        })
    }

    /// Regressor names, in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Estimated coefficients.
    pub const fn params(&self) -> &Array1<f64> {
        &self.params
    }

    /// Coefficient for the regressor called `name`.
    pub fn param(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.params[i])
    }

    /// Standard errors of the coefficients.
    pub const fn std_errors(&self) -> &Array1<f64> {
        &self.std_errors
    }

    /// t statistics (`coef / std err`).
    pub fn t_values(&self) -> Array1<f64> {
        &self.params / &self.std_errors
    }

    /// Two-sided p-values of the t statistics.
    pub fn p_values(&self) -> Array1<f64> {
        let df = self.df_resid();
        self.t_values().mapv(|t| student_t_two_sided_p(t, df))
    }

    /// Confidence intervals at significance level `alpha` (e.g. 0.05 for 95%).
    ///
    /// Returns `(lower, upper)` per coefficient.
    pub fn conf_int(&self, alpha: f64) -> Vec<(f64, f64)> {
        let q = student_t_quantile(1.0 - alpha / 2.0, self.df_resid());
        self.params
            .iter()
            .zip(self.std_errors.iter())
            .map(|(&b, &se)| (b - q * se, b + q * se))
            .collect()
    }

    /// Full coefficient table with `alpha`-level confidence intervals.
    pub fn coefficients(&self, alpha: f64) -> Vec<Coefficient> {
        let t_values = self.t_values();
        let p_values = self.p_values();
        let intervals = self.conf_int(alpha);

        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| Coefficient {
                name: name.clone(),
                estimate: self.params[i],
                std_error: self.std_errors[i],
                t_value: t_values[i],
                p_value: p_values[i],
                ci_lower: intervals[i].0,
                ci_upper: intervals[i].1,
            })
            .collect()
    }

    /// In-sample fitted values.
    pub const fn fitted(&self) -> &Array1<f64> {
        &self.fitted
    }

    /// Residuals (`y - fitted`).
    pub const fn residuals(&self) -> &Array1<f64> {
        &self.residuals
    }

    /// Number of observations.
    pub const fn nobs(&self) -> usize {
        self.nobs
    }

    /// Number of regressors, intercept included.
    pub fn n_params(&self) -> usize {
        self.params.len()
    }

    /// Whether the design contains a constant column.
    pub const fn has_constant(&self) -> bool {
        self.has_constant
    }

    /// Model degrees of freedom (regressors excluding the constant).
    pub fn df_model(&self) -> f64 {
        (self.n_params() - usize::from(self.has_constant)) as f64
    }

    /// Residual degrees of freedom.
    pub fn df_resid(&self) -> f64 {
        (self.nobs - self.n_params()) as f64
    }

    /// Sum of squared residuals.
    pub const fn ssr(&self) -> f64 {
        self.ssr
    }

    /// Coefficient of determination, centred when the model has a constant.
    pub fn r_squared(&self) -> f64 {
        1.0 - self.ssr / self.tss
    }

    /// R-squared adjusted for the number of regressors.
    pub fn adj_r_squared(&self) -> f64 {
        let n = self.nobs as f64;
        let k_const = f64::from(u8::from(self.has_constant));
        let df_resid = self.df_resid();
        if df_resid == 0.0 {
            return f64::NAN;
        }
        1.0 - (n - k_const) / df_resid * (1.0 - self.r_squared())
    }

    /// Standard deviation of the residuals.
    pub fn residual_std_error(&self) -> f64 {
        let df_resid = self.df_resid();
        if df_resid == 0.0 {
            return f64::NAN;
        }
        (self.ssr / df_resid).sqrt()
    }

    /// F statistic for the joint significance of the non-constant regressors.
    pub fn f_statistic(&self) -> f64 {
        let df_model = self.df_model();
        let df_resid = self.df_resid();
        if df_model == 0.0 || df_resid == 0.0 {
            return f64::NAN;
        }
        let explained = self.tss - self.ssr;
        (explained / df_model) / (self.ssr / df_resid)
    }

    /// p-value of the F statistic.
    pub fn f_p_value(&self) -> f64 {
        let f = self.f_statistic();
        if f.is_nan() {
            return f64::NAN;
        }
        f_survival(f, self.df_model(), self.df_resid())
    }

    /// Gaussian log-likelihood at the estimates.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion.
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.n_params() as f64
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood() + (self.nobs as f64).ln() * self.n_params() as f64
    }

    /// Durbin-Watson statistic of the residuals.
    pub fn durbin_watson(&self) -> f64 {
        let diff_sq: f64 = self
            .residuals
            .iter()
            .zip(self.residuals.iter().skip(1))
            .map(|(prev, next)| (next - prev).powi(2))
            .sum();
        diff_sq / self.ssr
    }
}
