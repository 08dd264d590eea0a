#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ff5/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod session;

// Re-export main types from sub-crates
pub use ff5_data as data;
pub use ff5_model as model;
pub use ff5_output as output;

pub use ff5_model::{EQUATION, TITLE};
pub use session::{PredictionSession, Result, SessionError, cumulative_returns};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_equation() {
        assert!(EQUATION.starts_with("R_it - R_ft = a_i"));
        assert_eq!(TITLE, "Fama-French 5 Factor Model");
    }
}
