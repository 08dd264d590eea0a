//! Interactive prediction state.
//!
//! A session owns the loaded data, the selected stock and the five factor
//! inputs. Fits are computed on first use and cached per stock, so changing
//! an input only re-evaluates the dot product.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use ff5_data::{DataError, DataSet};
use ff5_model::{Factor, FactorInputs, FactorModel, InputBounds, ModelError};
use ndarray::{Array2, ArrayView1};
use thiserror::Error;

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised by a [`PredictionSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// Loading or aligning data failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Fitting or input validation failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The returns file has no stocks to choose from
    #[error("No stocks available")]
    NoStocks,
}

/// A fit together with the factor observations it was estimated on.
#[derive(Debug, Clone)]
struct CachedFit {
    model: FactorModel,
    factors: Array2<f64>,
}

/// Compounded growth `prod(1 + r) - 1` at every point of `returns`.
pub fn cumulative_returns(returns: ArrayView1<'_, f64>) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |growth, r| {
            *growth *= 1.0 + r;
            Some(*growth - 1.0)
        })
        .collect()
}

/// Selected stock, factor inputs and cached fits.
#[derive(Debug)]
pub struct PredictionSession {
    data: DataSet,
    bounds: InputBounds,
    inputs: FactorInputs,
    selected: usize,
    fits: HashMap<String, CachedFit>,
}

impl PredictionSession {
    /// Start on the first stock with default inputs.
    ///
    /// # Errors
    /// * [`SessionError::NoStocks`] if there is nothing to select
    /// * [`SessionError::Model`] if `bounds` is unusable
    pub fn new(data: DataSet, bounds: InputBounds) -> Result<Self> {
        bounds.validate()?;
        if data.symbols().is_empty() {
            return Err(SessionError::NoStocks);
        }

        Ok(Self {
            data,
            bounds,
            inputs: FactorInputs::default(),
            selected: 0,
            fits: HashMap::new(),
        })
    }

    /// Replace the starting inputs, checking them against the bounds.
    pub fn with_inputs(mut self, inputs: FactorInputs) -> Result<Self> {
        inputs.validate(&self.bounds)?;
        self.inputs = inputs;
        Ok(self)
    }

    /// Loaded data.
    pub const fn data(&self) -> &DataSet {
        &self.data
    }

    /// Input range and step.
    pub const fn bounds(&self) -> &InputBounds {
        &self.bounds
    }

    /// Selectable stocks in file order.
    pub fn stocks(&self) -> &[String] {
        self.data.symbols()
    }

    /// Currently selected stock.
    pub fn selected(&self) -> &str {
        &self.stocks()[self.selected]
    }

    /// Position of the selected stock in [`PredictionSession::stocks`].
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Select `symbol`.
    pub fn select(&mut self, symbol: &str) -> Result<()> {
        let index = self
            .stocks()
            .iter()
            .position(|s| s == symbol)
            .ok_or_else(|| DataError::UnknownSymbol(symbol.to_string()))?;
        self.selected = index;
        tracing::debug!(symbol, "selected stock");
        Ok(())
    }

    /// Select the next stock, wrapping around.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.stocks().len();
    }

    /// Select the previous stock, wrapping around.
    pub fn select_previous(&mut self) {
        let count = self.stocks().len();
        self.selected = (self.selected + count - 1) % count;
    }

    /// Current factor inputs.
    pub const fn inputs(&self) -> &FactorInputs {
        &self.inputs
    }

    /// Set one input. Out-of-range values are rejected and the old value kept.
    pub fn set_input(&mut self, factor: Factor, value: f64) -> Result<()> {
        if let Err(err) = self.inputs.set(factor, value, &self.bounds) {
            tracing::warn!(%factor, value, "rejected factor input");
            return Err(err.into());
        }
        Ok(())
    }

    /// Move one input by `steps` increments, clamped to the bounds.
    pub fn nudge_input(&mut self, factor: Factor, steps: i64) -> f64 {
        self.inputs.nudge(factor, steps, &self.bounds)
    }

    fn fit(&mut self) -> Result<&CachedFit> {
        let symbol = self.selected().to_string();

        match self.fits.entry(symbol) {
            Entry::Occupied(entry) => {
                tracing::trace!(symbol = %entry.key(), "using cached fit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let sample = self.data.sample(entry.key())?;
                let model = FactorModel::fit(
                    &sample.symbol,
                    sample.dates,
                    &sample.dependent,
                    &sample.factors,
                )?;
                Ok(entry.insert(CachedFit {
                    model,
                    factors: sample.factors,
                }))
            }
        }
    }

    /// Fitted model for the selected stock, computed on first use.
    pub fn model(&mut self) -> Result<&FactorModel> {
        Ok(&self.fit()?.model)
    }

    /// Fitted model and predicted excess return for the current inputs.
    pub fn predict(&mut self) -> Result<(&FactorModel, f64)> {
        let inputs = self.inputs;
        let model = self.model()?;
        let excess_return = model.predict(&inputs);
        Ok((model, excess_return))
    }

    /// Compounded return of each factor over the selected stock's sample,
    /// in canonical factor order.
    pub fn cumulative_factor_returns(&mut self) -> Result<Vec<(Factor, Vec<f64>)>> {
        let fit = self.fit()?;
        Ok(Factor::ALL
            .iter()
            .map(|&factor| (factor, cumulative_returns(fit.factors.column(factor.index()))))
            .collect())
    }

    /// Drop every cached fit.
    pub fn clear_cache(&mut self) {
        self.fits.clear();
    }

    /// Number of cached fits.
    pub fn cached_fits(&self) -> usize {
        self.fits.len()
    }
}
