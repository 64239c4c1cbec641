use std::error::Error;
use std::io;
use std::path::PathBuf;

use alias_romberg::{integrate, prompt_config, render_table, Integrand, RombergConfig};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "alias-romberg",
    about = "Romberg integration with alias out-parameters"
)]
struct Cli {
    /// YAML configuration describing the run.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Lower limit of integration.
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<f64>,
    /// Upper limit of integration.
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f64>,
    /// Number of table rows.
    #[arg(long)]
    rows: Option<usize>,
    /// Convergence tolerance on the diagonal.
    #[arg(long)]
    tolerance: Option<f64>,
    /// Function to integrate (sine or gaussian).
    #[arg(long)]
    integrand: Option<Integrand>,
    /// Ask for the limits and row count on stdin.
    #[arg(long)]
    interactive: bool,
    /// Emit the table as JSON instead of the text report.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => RombergConfig::load(path)?,
        None => RombergConfig::default(),
    };
    if let Some(lower) = cli.lower {
        config.lower = lower;
    }
    if let Some(upper) = cli.upper {
        config.upper = upper;
    }
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(tolerance) = cli.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(integrand) = cli.integrand {
        config.integrand = integrand;
    }

    if cli.interactive {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        match prompt_config(&mut input, &mut output, &config)? {
            Some(answered) => config = answered,
            None => return Ok(()),
        }
    }

    let table = integrate(&config)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", render_table(&table));
    }
    Ok(())
}
