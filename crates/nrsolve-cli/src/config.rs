//! Default run settings loaded from TOML.
//!
//! ```toml
//! x0 = 1.5
//! epsilon = 1e-8
//! max_iterations = 100
//! precision = 10
//! division_threshold = 1e-12
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nrsolve_math::expression::DEFAULT_DIVISION_THRESHOLD;

use crate::error::{CliError, CliResult};

/// Name of the settings file looked up in the working directory.
pub const LOCAL_SETTINGS_FILE: &str = "nrsolve.toml";

/// Default run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Initial guess
    #[serde(default = "default_x0")]
    pub x0: f64,

    /// Convergence tolerance on successive iterates
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Maximum number of iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Digits after the decimal point in tables and CSV logs
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Divisor magnitude below which `/` fails inside expressions
    #[serde(default = "default_division_threshold")]
    pub division_threshold: f64,
}

fn default_x0() -> f64 {
    1.0
}

fn default_epsilon() -> f64 {
    1e-4
}

fn default_max_iterations() -> u32 {
    50
}

fn default_precision() -> usize {
    8
}

fn default_division_threshold() -> f64 {
    DEFAULT_DIVISION_THRESHOLD
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            x0: default_x0(),
            epsilon: default_epsilon(),
            max_iterations: default_max_iterations(),
            precision: default_precision(),
            division_threshold: default_division_threshold(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve settings: an explicit path must exist; otherwise the first
    /// existing candidate file is used, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = explicit {
            info!("Loading settings from {}", path.display());
            return Self::from_file(path);
        }

        for path in candidate_paths() {
            if path.is_file() {
                info!("Loading settings from {}", path.display());
                return Self::from_file(&path);
            }
        }

        debug!("No settings file found, using defaults");
        Ok(Self::default())
    }
}

/// Settings files searched when none is given explicitly.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_SETTINGS_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("nrsolve").join("config.toml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.x0, 1.0);
        assert_eq!(settings.epsilon, 1e-4);
        assert_eq!(settings.max_iterations, 50);
        assert_eq!(settings.precision, 8);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml("epsilon = 1e-9\nmax_iterations = 10\n").unwrap();
        assert_eq!(settings.epsilon, 1e-9);
        assert_eq!(settings.max_iterations, 10);
        assert_eq!(settings.x0, 1.0);
        assert_eq!(settings.division_threshold, DEFAULT_DIVISION_THRESHOLD);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Settings::from_toml("tolerance = 1e-6\n").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x0 = -2.5\nprecision = 4").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.x0, -2.5);
        assert_eq!(settings.precision, 4);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(CliError::Io(_))
        ));
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x0 = \"one\"").unwrap();
        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(CliError::Config(_))
        ));
    }
}
