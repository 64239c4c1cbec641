//! Interactive parameter gathering through alias out-parameters.

use std::io::{BufRead, Write};

use alias_core::{Alias, ErrorInfo};
use log::debug;

use crate::config::RombergConfig;
use crate::errors::RombergError;

/// Prompts for the integration limits and the row count.
///
/// Results are written through the aliases the way a C routine writes through
/// pointer arguments: `ok` receives whether the run should proceed, `a` and `b`
/// the limits, `n` the row count. Malformed answers are reported on `output`
/// and asked again; running out of input is an error.
pub fn gather_inputs<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    ok: &Alias,
    a: &Alias,
    b: &Alias,
    n: &Alias,
) -> Result<(), RombergError> {
    writeln!(output, "This is Romberg integration.\n")?;
    writeln!(
        output,
        "Has the function F been created in the program immediately preceding"
    )?;
    writeln!(output, "the INPUT function?")?;
    write!(output, "Enter Y or N: ")?;
    output.flush()?;
    let answer = read_line(input)?;
    if !matches!(answer.trim(), "Y" | "y") {
        writeln!(
            output,
            "The program will end so that the function F can be created"
        )?;
        ok.set_dereferenced(false)?;
        return Ok(());
    }

    ok.set_dereferenced(false)?;
    while !is_set(ok)? {
        writeln!(
            output,
            "Input lower limit of integration and upper limit of integration"
        )?;
        write!(output, "separated by a blank: ")?;
        output.flush()?;
        let line = read_line(input)?;
        let limits: Vec<f64> = line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<_, _>>()
            .unwrap_or_default();
        if limits.len() != 2 {
            writeln!(output, "Two values must be entered.")?;
            continue;
        }
        a.set_dereferenced(limits[0])?;
        b.set_dereferenced(limits[1])?;
        if read_float(a)? > read_float(b)? {
            writeln!(output, "Lower limit must be less than upper limit")?;
        } else {
            ok.set_dereferenced(true)?;
        }
    }

    ok.set_dereferenced(false)?;
    while !is_set(ok)? {
        write!(output, "Input number of rows (no decimal point): ")?;
        output.flush()?;
        let line = read_line(input)?;
        match line.trim().parse::<i64>() {
            Ok(rows) => {
                n.set_dereferenced(rows)?;
                if rows > 0 {
                    ok.set_dereferenced(true)?;
                } else {
                    writeln!(output, "Number must be a positive integer")?;
                }
            }
            Err(_) => writeln!(output, "Number must be a positive integer")?,
        }
    }
    debug!("inputs gathered: a={a}, b={b}, n={n}");
    Ok(())
}

/// Runs [`gather_inputs`] with fresh empty aliases and folds the answers into
/// `base`. Returns `None` when the user declined to continue.
pub fn prompt_config<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    base: &RombergConfig,
) -> Result<Option<RombergConfig>, RombergError> {
    let ok = Alias::empty();
    let a = Alias::empty();
    let b = Alias::empty();
    let n = Alias::empty();

    gather_inputs(input, output, &ok, &a, &b, &n)?;

    if !is_set(&ok)? {
        return Ok(None);
    }
    let rows = n.dereference()?.as_int().unwrap_or_default();
    Ok(Some(RombergConfig {
        lower: read_float(&a)?,
        upper: read_float(&b)?,
        rows: usize::try_from(rows).unwrap_or_default(),
        ..base.clone()
    }))
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String, RombergError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(RombergError::Input(ErrorInfo::new(
            "unexpected-eof",
            "input ended before all parameters were read",
        )));
    }
    Ok(line)
}

fn is_set(flag: &Alias) -> Result<bool, RombergError> {
    Ok(flag.dereference()?.as_bool().unwrap_or(false))
}

fn read_float(alias: &Alias) -> Result<f64, RombergError> {
    let value = alias.dereference()?;
    value.as_float().ok_or_else(|| {
        RombergError::Input(
            ErrorInfo::new("not-a-number", "expected a numeric value")
                .with_context("type", value.type_name()),
        )
    })
}
