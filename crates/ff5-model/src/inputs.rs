//! User-supplied factor values for prediction.

use serde::{Deserialize, Serialize};

use crate::{Factor, ModelError, Result};

/// Accepted range and increment for factor inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBounds {
    /// Smallest accepted value (default: -10.0)
    pub min: f64,
    /// Largest accepted value (default: 10.0)
    pub max: f64,
    /// Increment used when nudging a value (default: 0.000001)
    pub step: f64,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            min: -10.0,
            max: 10.0,
            step: 0.000001,
        }
    }
}

impl InputBounds {
    /// Check that the bounds themselves are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min < self.max) {
            return Err(ModelError::InvalidParameter(format!(
                "input range [{}, {}] is empty",
                self.min, self.max
            )));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "input step must be positive, got {}",
                self.step
            )));
        }
        Ok(())
    }

    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Clamp `value` into the range.
    pub const fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// One value per factor, used as the right-hand side of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorInputs {
    /// Market excess return
    #[serde(rename = "Mkt-RF")]
    pub market_excess: f64,
    /// Size factor
    #[serde(rename = "SMB")]
    pub smb: f64,
    /// Value factor
    #[serde(rename = "HML")]
    pub hml: f64,
    /// Profitability factor
    #[serde(rename = "RMW")]
    pub rmw: f64,
    /// Investment factor
    #[serde(rename = "CMA")]
    pub cma: f64,
}

impl Default for FactorInputs {
    fn default() -> Self {
        Self {
            market_excess: 0.007745,
            smb: 0.001468,
            hml: 0.000196,
            rmw: 0.003084,
            cma: 0.001693,
        }
    }
}

impl FactorInputs {
    /// Build inputs from values in canonical factor order.
    pub const fn from_values(values: [f64; 5]) -> Self {
        Self {
            market_excess: values[0],
            smb: values[1],
            hml: values[2],
            rmw: values[3],
            cma: values[4],
        }
    }

    /// Values in canonical factor order.
    pub const fn values(&self) -> [f64; 5] {
        [self.market_excess, self.smb, self.hml, self.rmw, self.cma]
    }

    /// Current value for `factor`.
    pub const fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::MarketExcess => self.market_excess,
            Factor::Smb => self.smb,
            Factor::Hml => self.hml,
            Factor::Rmw => self.rmw,
            Factor::Cma => self.cma,
        }
    }

    const fn slot(&mut self, factor: Factor) -> &mut f64 {
        match factor {
            Factor::MarketExcess => &mut self.market_excess,
            Factor::Smb => &mut self.smb,
            Factor::Hml => &mut self.hml,
            Factor::Rmw => &mut self.rmw,
            Factor::Cma => &mut self.cma,
        }
    }

    /// Set `factor` to `value`, rejecting values outside `bounds`.
    ///
    /// The previous value is kept when the new one is rejected.
    pub fn set(&mut self, factor: Factor, value: f64, bounds: &InputBounds) -> Result<()> {
        if !bounds.contains(value) {
            return Err(ModelError::OutOfBounds {
                factor: factor.column().to_string(),
                value,
                min: bounds.min,
                max: bounds.max,
            });
        }
        *self.slot(factor) = value;
        Ok(())
    }

    /// Move `factor` by `steps` increments, clamped to `bounds`.
    ///
    /// The result is snapped to the step grid so repeated nudges do not
    /// accumulate floating-point drift.
    pub fn nudge(&mut self, factor: Factor, steps: i64, bounds: &InputBounds) -> f64 {
        let current = self.get(factor);
        let moved = current + steps as f64 * bounds.step;
        let snapped = (moved / bounds.step).round() * bounds.step;
        let value = bounds.clamp(snapped);
        *self.slot(factor) = value;
        value
    }

    /// Check every value against `bounds`.
    pub fn validate(&self, bounds: &InputBounds) -> Result<()> {
        for factor in Factor::ALL {
            let value = self.get(factor);
            if !bounds.contains(value) {
                return Err(ModelError::OutOfBounds {
                    factor: factor.column().to_string(),
                    value,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(())
    }
}

/// Render an input the way the input widgets show it (six decimals).
pub fn format_input(value: f64) -> String {
    format!("{:.6}", value)
}
