//! Application configuration.
//!
//! Read from JSON. Every field is optional; missing ones take the built-in
//! defaults. Command-line flags are applied on top.

use std::fs;
use std::path::{Path, PathBuf};

use ff5_data::DataPaths;
use ff5_model::{FactorInputs, InputBounds};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading the configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON
    #[error("Invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Input bounds or default inputs are unusable
    #[error("Invalid config: {0}")]
    Invalid(#[from] ff5_model::ModelError),
}

/// Data locations, input limits and starting inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Input CSV files
    pub(crate) data: DataPaths,
    /// Accepted input range and nudge step
    pub(crate) bounds: InputBounds,
    /// Factor values the dashboard starts with
    pub(crate) inputs: FactorInputs,
}

impl AppConfig {
    /// `<config_dir>/ff5/config.json`, when the platform has a config directory.
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ff5").join("config.json"))
    }

    /// Load from `explicit` if given, else from the default path if that file
    /// exists, else use defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.bounds.validate()?;
        config.inputs.validate(&config.bounds)?;
        Ok(config)
    }

    /// Parse a configuration file.
    pub(crate) fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply data location flags. A directory sets both files; explicit file
    /// flags win over the directory.
    pub(crate) fn override_paths(
        &mut self,
        data_dir: Option<&Path>,
        factors_file: Option<PathBuf>,
        returns_file: Option<PathBuf>,
    ) {
        if let Some(dir) = data_dir {
            self.data = DataPaths::from_dir(dir);
        }
        if let Some(path) = factors_file {
            self.data.factors = path;
        }
        if let Some(path) = returns_file {
            self.data.returns = path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ff5_config_{}_{}.json", name, std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_file(
            "partial",
            r#"{ "inputs": { "Mkt-RF": 0.01, "SMB": 0.0, "HML": 0.0, "RMW": 0.0, "CMA": 0.0 } }"#,
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.inputs.market_excess, 0.01);
        assert_eq!(config.bounds, InputBounds::default());
        assert_eq!(config.data, DataPaths::default());

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_single_input_key() {
        let path = temp_file("one_key", r#"{ "inputs": { "Mkt-RF": 0.01 } }"#);

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.inputs.market_excess, 0.01);
        assert_eq!(config.inputs.smb, FactorInputs::default().smb);
        assert_eq!(config.inputs.cma, FactorInputs::default().cma);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_single_bounds_key() {
        let path = temp_file("bounds_key", r#"{ "bounds": { "step": 0.0001 } }"#);

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.bounds.step, 0.0001);
        assert_eq!(config.bounds.min, InputBounds::default().min);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_data_paths_from_file() {
        let path = temp_file(
            "paths",
            r#"{ "data": { "factors": "/srv/ff.csv", "returns": "/srv/rets.csv" } }"#,
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data.factors, PathBuf::from("/srv/ff.csv"));
        assert_eq!(config.inputs, FactorInputs::default());

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_json() {
        let path = temp_file("invalid", "{ not json");
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(ConfigError::Json { .. })
        ));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_inputs_outside_bounds() {
        let path = temp_file(
            "bounds",
            r#"{ "bounds": { "min": -1.0, "max": 1.0, "step": 0.01 },
                 "inputs": { "Mkt-RF": 2.0, "SMB": 0.0, "HML": 0.0, "RMW": 0.0, "CMA": 0.0 } }"#,
        );
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(ConfigError::Invalid(_))
        ));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_explicit_file() {
        let path = std::env::temp_dir().join("ff5_config_missing.json");
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_override_paths() {
        let mut config = AppConfig::default();
        config.override_paths(
            Some(Path::new("/data")),
            None,
            Some(PathBuf::from("/other/rets.csv")),
        );

        assert_eq!(
            config.data.factors,
            PathBuf::from("/data/fama_french_5_factor_rets.csv")
        );
        assert_eq!(config.data.returns, PathBuf::from("/other/rets.csv"));
    }
}
