//! The five Fama-French factors.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ModelError;

/// Column holding the risk-free rate in the factor file.
pub const RISK_FREE_COLUMN: &str = "RF";

/// Fama-French five-factor model factors, in regression order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub enum Factor {
    /// Market return in excess of the risk-free rate
    #[display("Mkt-RF")]
    #[serde(rename = "Mkt-RF")]
    MarketExcess,

    /// Small minus big (size)
    #[display("SMB")]
    #[serde(rename = "SMB")]
    Smb,

    /// High minus low book-to-market (value)
    #[display("HML")]
    #[serde(rename = "HML")]
    Hml,

    /// Robust minus weak operating profitability
    #[display("RMW")]
    #[serde(rename = "RMW")]
    Rmw,

    /// Conservative minus aggressive investment
    #[display("CMA")]
    #[serde(rename = "CMA")]
    Cma,
}

impl Factor {
    /// All factors in canonical regression order.
    pub const ALL: [Self; 5] = [Self::MarketExcess, Self::Smb, Self::Hml, Self::Rmw, Self::Cma];

    /// Column name in the factor CSV.
    pub const fn column(&self) -> &'static str {
        match self {
            Self::MarketExcess => "Mkt-RF",
            Self::Smb => "SMB",
            Self::Hml => "HML",
            Self::Rmw => "RMW",
            Self::Cma => "CMA",
        }
    }

    /// Position in [`Factor::ALL`].
    pub const fn index(&self) -> usize {
        match self {
            Self::MarketExcess => 0,
            Self::Smb => 1,
            Self::Hml => 2,
            Self::Rmw => 3,
            Self::Cma => 4,
        }
    }

    /// Coefficient letter used in the model equation.
    pub const fn loading_symbol(&self) -> &'static str {
        match self {
            Self::MarketExcess => "b",
            Self::Smb => "s",
            Self::Hml => "h",
            Self::Rmw => "r",
            Self::Cma => "c",
        }
    }

    /// Long description of the factor.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::MarketExcess => "Market excess return",
            Self::Smb => "Size (small minus big)",
            Self::Hml => "Value (high minus low)",
            Self::Rmw => "Profitability (robust minus weak)",
            Self::Cma => "Investment (conservative minus aggressive)",
        }
    }

    /// Look up a factor by its exact CSV column name.
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == column)
    }
}

impl FromStr for Factor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace(['-', '_', ' '], "");

        let factor = match normalized.as_str() {
            "mktrf" | "mkt" | "market" => Self::MarketExcess,
            "smb" | "size" => Self::Smb,
            "hml" | "value" => Self::Hml,
            "rmw" | "profitability" => Self::Rmw,
            "cma" | "investment" => Self::Cma,
            _ => return Err(ModelError::InvalidParameter(format!("Unknown factor: {}", s))),
        };

        Ok(factor)
    }
}
