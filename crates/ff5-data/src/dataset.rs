//! Input file locations and the loaded pair of tables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    ExcessReturns, FactorReturns, RegressionSample, Result, build_sample, load_excess_returns,
    load_factor_returns,
};

/// Default factor returns file name.
pub const FACTORS_FILE: &str = "fama_french_5_factor_rets.csv";

/// Default stock returns file name.
pub const RETURNS_FILE: &str = "yahoo_rets.csv";

/// Default data directory, relative to the working directory.
pub const DATA_DIR: &str = "data";

/// Locations of the two input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Factor returns CSV
    pub factors: PathBuf,
    /// Stock returns CSV
    pub returns: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::from_dir(DATA_DIR)
    }
}

impl DataPaths {
    /// Both default file names inside `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            factors: dir.join(FACTORS_FILE),
            returns: dir.join(RETURNS_FILE),
        }
    }
}

/// Factor returns and stock excess returns, loaded together.
#[derive(Debug, Clone)]
pub struct DataSet {
    factors: FactorReturns,
    returns: ExcessReturns,
}

impl DataSet {
    /// Load factor returns first, then stock returns net of `RF`.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let factors = load_factor_returns(&paths.factors)?;
        let returns = load_excess_returns(&paths.returns, &factors)?;
        Ok(Self { factors, returns })
    }

    /// Pair already loaded tables.
    pub const fn new(factors: FactorReturns, returns: ExcessReturns) -> Self {
        Self { factors, returns }
    }

    /// Factor returns.
    pub const fn factors(&self) -> &FactorReturns {
        &self.factors
    }

    /// Stock excess returns.
    pub const fn returns(&self) -> &ExcessReturns {
        &self.returns
    }

    /// Selectable stock symbols.
    pub fn symbols(&self) -> &[String] {
        self.returns.symbols()
    }

    /// Regression sample for `symbol`.
    pub fn sample(&self, symbol: &str) -> Result<RegressionSample> {
        build_sample(symbol, &self.returns, &self.factors)
    }
}
