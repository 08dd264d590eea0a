//! Factor and stock return tables.

use std::collections::HashMap;
use std::path::Path;

use ff5_model::{Factor, RISK_FREE_COLUMN};
use polars::prelude::*;

use crate::frame::{DATE_COLUMN, date_labels, float_values, read_indexed_csv, value_columns};
use crate::{DataError, Result};

const ROW_COLUMN: &str = "__row";
const RATE_COLUMN: &str = "__rf";

/// Monthly factor returns keyed by date label.
#[derive(Debug, Clone)]
pub struct FactorReturns {
    frame: DataFrame,
    dates: Vec<String>,
    factors: [Vec<Option<f64>>; 5],
    risk_free: Vec<Option<f64>>,
    rows: HashMap<String, usize>,
}

impl FactorReturns {
    fn from_frame(frame: DataFrame, source: &str) -> Result<Self> {
        let columns = value_columns(&frame);
        for required in Factor::ALL
            .iter()
            .map(Factor::column)
            .chain(std::iter::once(RISK_FREE_COLUMN))
        {
            if !columns.iter().any(|c| c == required) {
                return Err(DataError::MissingColumn {
                    file: source.to_string(),
                    column: required.to_string(),
                });
            }
        }

        let dates = date_labels(&frame)?;
        let factors = [
            float_values(&frame, Factor::MarketExcess.column())?,
            float_values(&frame, Factor::Smb.column())?,
            float_values(&frame, Factor::Hml.column())?,
            float_values(&frame, Factor::Rmw.column())?,
            float_values(&frame, Factor::Cma.column())?,
        ];
        let risk_free = float_values(&frame, RISK_FREE_COLUMN)?;

        // First occurrence wins for duplicated labels
        let mut rows = HashMap::with_capacity(dates.len());
        for (i, date) in dates.iter().enumerate() {
            rows.entry(date.clone()).or_insert(i);
        }

        Ok(Self {
            frame,
            dates,
            factors,
            risk_free,
            rows,
        })
    }

    /// The loaded table, date column first.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Date labels in file order.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Row index for a date label.
    pub fn row(&self, date: &str) -> Option<usize> {
        self.rows.get(date).copied()
    }

    /// Value of `factor` at `row`, `None` when missing.
    pub fn value(&self, row: usize, factor: Factor) -> Option<f64> {
        self.factors[factor.index()].get(row).copied().flatten()
    }

    /// Full series for `factor` in file order.
    pub fn series(&self, factor: Factor) -> &[Option<f64>] {
        &self.factors[factor.index()]
    }

    /// Risk-free rate series in file order.
    pub fn risk_free(&self) -> &[Option<f64>] {
        &self.risk_free
    }

    /// `date, __rf` with one row per distinct date label. The rate column is
    /// renamed so a stock called `RF` does not collide with it.
    fn risk_free_frame(&self) -> Result<DataFrame> {
        let (dates, rates): (Vec<&str>, Vec<Option<f64>>) = self
            .dates
            .iter()
            .enumerate()
            .filter(|(i, date)| self.rows.get(date.as_str()) == Some(i))
            .map(|(i, date)| (date.as_str(), self.risk_free[i]))
            .unzip();

        Ok(df! {
            DATE_COLUMN => dates,
            RATE_COLUMN => rates,
        }?)
    }
}

/// Stock excess returns keyed by date label, one series per stock.
#[derive(Debug, Clone)]
pub struct ExcessReturns {
    dates: Vec<String>,
    symbols: Vec<String>,
    series: Vec<Vec<Option<f64>>>,
}

impl ExcessReturns {
    /// Stock symbols in file order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Date labels in file order.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Whether `symbol` has a column.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Excess return series for `symbol`, aligned with [`ExcessReturns::dates`].
    pub fn series(&self, symbol: &str) -> Result<&[Option<f64>]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.series[i].as_slice())
            .ok_or_else(|| DataError::UnknownSymbol(symbol.to_string()))
    }

    /// Number of periods with an excess return for `symbol`.
    pub fn observation_count(&self, symbol: &str) -> Result<usize> {
        Ok(self.series(symbol)?.iter().flatten().count())
    }
}

/// Load the factor return table.
///
/// # Errors
/// * [`DataError::MissingColumn`] if any of the five factors or `RF` is absent
pub fn load_factor_returns(path: impl AsRef<Path>) -> Result<FactorReturns> {
    let path = path.as_ref();
    let frame = read_indexed_csv(path)?;
    let factors = FactorReturns::from_frame(frame, &path.display().to_string())?;

    tracing::info!(
        path = %path.display(),
        rows = factors.len(),
        "loaded factor returns"
    );

    Ok(factors)
}

/// Load stock returns and convert them to excess returns.
///
/// `RF` is matched on the date label. Periods without a risk-free rate come
/// out missing.
pub fn load_excess_returns(
    path: impl AsRef<Path>,
    factors: &FactorReturns,
) -> Result<ExcessReturns> {
    let path = path.as_ref();
    let frame = read_indexed_csv(path)?;

    let symbols = value_columns(&frame);
    if symbols.is_empty() {
        return Err(DataError::Empty(format!(
            "{} has no stock return columns",
            path.display()
        )));
    }

    let selection: Vec<Expr> = std::iter::once(col(DATE_COLUMN))
        .chain(symbols.iter().map(|s| col(s.as_str())))
        .collect();
    let excess_columns: Vec<Expr> = symbols
        .iter()
        .map(|s| {
            (col(s.as_str()).cast(DataType::Float64) - col(RATE_COLUMN)).alias(s.as_str())
        })
        .collect();

    let excess = frame
        .lazy()
        .select(selection.clone())
        .with_row_index(ROW_COLUMN, None)
        .join(
            factors.risk_free_frame()?.lazy(),
            [col(DATE_COLUMN)],
            [col(DATE_COLUMN)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([ROW_COLUMN], SortMultipleOptions::default())
        .with_columns(excess_columns)
        .select(selection)
        .collect()?;

    let dates = date_labels(&excess)?;
    let series = symbols
        .iter()
        .map(|s| float_values(&excess, s))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        path = %path.display(),
        rows = dates.len(),
        stocks = symbols.len(),
        "loaded excess returns"
    );

    Ok(ExcessReturns {
        dates,
        symbols,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor_frame() -> DataFrame {
        df! {
            DATE_COLUMN => ["2020-01", "2020-02", "2020-01"],
            "Mkt-RF" => [Some(0.01), Some(0.02), Some(0.09)],
            "SMB" => [Some(0.001), None, Some(0.009)],
            "HML" => [0.002, 0.003, 0.009],
            "RMW" => [0.004, 0.005, 0.009],
            "CMA" => [0.006, 0.007, 0.009],
            "RF" => [0.0001, 0.0002, 0.0009],
        }
        .unwrap()
    }

    #[test]
    fn test_lookup_by_date() {
        let factors = FactorReturns::from_frame(factor_frame(), "test").unwrap();

        assert_eq!(factors.len(), 3);
        assert_eq!(factors.row("2020-02"), Some(1));
        assert_eq!(factors.row("2020-01"), Some(0));
        assert_eq!(factors.row("2020-03"), None);
        assert_eq!(factors.value(0, Factor::MarketExcess), Some(0.01));
        assert_eq!(factors.value(1, Factor::Smb), None);
        assert_eq!(factors.risk_free()[1], Some(0.0002));
    }

    #[test]
    fn test_risk_free_frame_drops_duplicate_dates() {
        let factors = FactorReturns::from_frame(factor_frame(), "test").unwrap();
        let rf = factors.risk_free_frame().unwrap();

        assert_eq!(rf.height(), 2);
        assert_eq!(float_values(&rf, RATE_COLUMN).unwrap()[0], Some(0.0001));
    }

    #[test]
    fn test_missing_factor_column() {
        let frame = factor_frame().drop("CMA").unwrap();
        let err = FactorReturns::from_frame(frame, "factors.csv").unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingColumn { ref column, .. } if column == "CMA"
        ));
    }

    #[test]
    fn test_unknown_symbol() {
        let returns = ExcessReturns {
            dates: vec!["2020-01".into()],
            symbols: vec!["AAPL".into()],
            series: vec![vec![Some(0.01)]],
        };

        assert!(returns.contains("AAPL"));
        assert_eq!(returns.observation_count("AAPL").unwrap(), 1);
        assert!(matches!(
            returns.series("MSFT"),
            Err(DataError::UnknownSymbol(ref s)) if s == "MSFT"
        ));
    }
}
