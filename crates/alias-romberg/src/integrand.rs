use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Function integrated by the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrand {
    /// `sin(x)`.
    Sine,
    /// Normal density scaled so the integral over the real line is 1: `e^(-x^2) / sqrt(pi)`.
    #[default]
    Gaussian,
}

impl Integrand {
    /// Evaluates the integrand at `x`.
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Integrand::Sine => x.sin(),
            Integrand::Gaussian => (-x * x).exp() / PI.sqrt(),
        }
    }
}

impl fmt::Display for Integrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integrand::Sine => write!(f, "sine"),
            Integrand::Gaussian => write!(f, "gaussian"),
        }
    }
}

impl FromStr for Integrand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(Integrand::Sine),
            "gaussian" | "gauss" => Ok(Integrand::Gaussian),
            other => Err(format!("unknown integrand `{other}` (expected sine or gaussian)")),
        }
    }
}
