use std::fs;
use std::path::Path;

use alias_core::ErrorInfo;
use serde::{Deserialize, Serialize};

use crate::errors::{config_error, RombergError};
use crate::integrand::Integrand;

/// Largest accepted row count; row `i` evaluates the integrand `2^(i-2)` times.
pub const MAX_ROWS: usize = 24;

/// YAML-configurable parameters of a Romberg run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RombergConfig {
    /// Lower limit of integration.
    pub lower: f64,
    /// Upper limit of integration.
    pub upper: f64,
    /// Number of table rows to compute.
    pub rows: usize,
    /// Convergence tolerance on the last two diagonal entries.
    pub tolerance: f64,
    /// Function to integrate.
    pub integrand: Integrand,
}

impl Default for RombergConfig {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
            rows: 8,
            tolerance: 1e-8,
            integrand: Integrand::default(),
        }
    }
}

impl RombergConfig {
    /// Parses a YAML document; missing fields take their defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, RombergError> {
        serde_yaml::from_str(contents).map_err(|err| config_error("yaml-deserialize", err.to_string()))
    }

    /// Reads and parses a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, RombergError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Checks the limits, the row count and the tolerance.
    pub fn validate(&self) -> Result<(), RombergError> {
        if !(self.lower.is_finite() && self.upper.is_finite()) {
            return Err(config_error("non-finite-limits", "limits must be finite"));
        }
        if self.lower > self.upper {
            return Err(RombergError::Config(
                ErrorInfo::new(
                    "inverted-limits",
                    "lower limit must be less than upper limit",
                )
                .with_context("lower", self.lower)
                .with_context("upper", self.upper),
            ));
        }
        if self.rows == 0 || self.rows > MAX_ROWS {
            return Err(RombergError::Config(
                ErrorInfo::new("rows-out-of-range", "number of rows must be positive")
                    .with_context("rows", self.rows)
                    .with_hint(format!("use between 1 and {MAX_ROWS} rows")),
            ));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(config_error("negative-tolerance", "tolerance must be non-negative"));
        }
        Ok(())
    }
}
