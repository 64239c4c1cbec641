//! Romberg extrapolation over a two-row table stored behind aliases.

use std::fmt;

use alias_core::{Alias, ErrorInfo, Value};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::RombergConfig;
use crate::errors::RombergError;
use crate::integrand::Integrand;

/// Rows produced by a Romberg run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RombergTable {
    /// Lower limit of integration.
    pub lower: f64,
    /// Upper limit of integration.
    pub upper: f64,
    /// Number of rows requested.
    pub rows: usize,
    /// Tolerance used for early termination.
    pub tolerance: f64,
    /// Function that was integrated.
    pub integrand: Integrand,
    /// Computed rows; row `i` (0-based) holds `i + 1` entries.
    pub table: Vec<Vec<f64>>,
    /// Last diagonal entry, the best approximation of the integral.
    pub estimate: f64,
    /// Row (1-based) at which the diagonal stopped moving, if it did.
    pub converged_at: Option<usize>,
}

/// Runs the Romberg algorithm described by `config`.
///
/// Only two rows are kept in storage: the previous row and the current one.
/// Both live in detached aliases, reached through an outer alias over the
/// pair, so every table access goes through pointer-style indexing.
pub fn integrate(config: &RombergConfig) -> Result<RombergTable, RombergError> {
    config.validate()?;
    let n = config.rows;
    let (a, b) = (config.lower, config.upper);
    let f = |x: f64| config.integrand.eval(x);

    let storage = Alias::detached(vec![
        Value::from(Alias::detached(vec![Value::None; n])),
        Value::from(Alias::detached(vec![Value::None; n])),
    ]);
    let prev = row(&storage, 0)?;
    let cur = row(&storage, 1)?;

    let mut h = b - a;
    prev.set(0, (f(a) + f(b)) / 2.0 * h)?;
    let mut table = vec![vec![cell(&prev, 0)?]];
    let mut converged_at = None;

    for i in 2..=n {
        // Trapezoid refinement over the 2^(i-2) new midpoints.
        let midpoints = 1usize << (i - 2);
        let sum: f64 = (1..=midpoints)
            .map(|k| f(a + (k as f64 - 0.5) * h))
            .sum();
        cur.set(0, (cell(&prev, 0)? + h * sum) / 2.0)?;

        for j in 2..=i {
            let weight = 4f64.powi((j - 1) as i32) - 1.0;
            let left = cell(&cur, j - 2)?;
            let extrapolated = left + (left - cell(&prev, j - 2)?) / weight;
            cur.set(j - 1, extrapolated)?;
        }
        let line = (0..i).map(|k| cell(&cur, k)).collect::<Result<Vec<_>, _>>()?;
        debug!("row {i}: {line:?}");
        table.push(line);

        if i > 3 {
            let settled = (cell(&prev, i - 2)? - cell(&cur, i - 1)?).abs() <= config.tolerance
                && (cell(&prev, i - 3)? - cell(&cur, i - 2)?).abs() <= config.tolerance;
            if settled {
                info!("diagonal settled within {:e} at row {i}", config.tolerance);
                converged_at = Some(i);
                break;
            }
        }

        h /= 2.0;
        for j in 0..i {
            prev.set(j, cell(&cur, j)?)?;
        }
    }

    let estimate = table
        .last()
        .and_then(|line| line.last())
        .copied()
        .unwrap_or_default();
    Ok(RombergTable {
        lower: a,
        upper: b,
        rows: n,
        tolerance: config.tolerance,
        integrand: config.integrand,
        table,
        estimate,
        converged_at,
    })
}

/// Formats the table the way the console report prints it.
pub fn render_table(table: &RombergTable) -> String {
    table.to_string()
}

impl fmt::Display for RombergTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Initial Data:")?;
        writeln!(
            f,
            "Limits of integration = [{:12.8}, {:12.8}]",
            self.lower, self.upper
        )?;
        writeln!(f, "Number of rows = {:3}", self.rows)?;
        writeln!(f, "\nRomberg Integration Table:")?;
        for (i, line) in self.table.iter().enumerate() {
            if i == 0 {
                writeln!(f, "\n{:12.8}\n", line[0])?;
                continue;
            }
            for value in line {
                write!(f, " {value:11.8}")?;
            }
            writeln!(f)?;
        }
        if let Some(row) = self.converged_at {
            writeln!(
                f,
                "Last element not changing within {:12.8e} for last two iterations.",
                self.tolerance
            )?;
            writeln!(
                f,
                "Algorithm terminated at F = {:12.8} after {row} iterations",
                self.estimate
            )?;
        }
        Ok(())
    }
}

fn row(storage: &Alias, index: i64) -> Result<Alias, RombergError> {
    match storage.get(index)? {
        Value::Alias(row) => Ok(row),
        other => Err(RombergError::Table(
            ErrorInfo::new("row-not-alias", "table row is not an alias")
                .with_context("row", index)
                .with_context("type", other.type_name()),
        )),
    }
}

fn cell(row: &Alias, column: usize) -> Result<f64, RombergError> {
    let value = row.get(column)?;
    value.as_float().ok_or_else(|| {
        RombergError::Table(
            ErrorInfo::new("unset-cell", "table cell holds no number")
                .with_context("column", column)
                .with_context("type", value.type_name()),
        )
    })
}
