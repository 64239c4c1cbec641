use std::f64::consts::PI;

use alias_romberg::{integrate, render_table, Integrand, RombergConfig, RombergError};

#[test]
fn sine_over_half_period_is_two() {
    let config = RombergConfig {
        lower: 0.0,
        upper: PI,
        rows: 6,
        tolerance: 0.0,
        integrand: Integrand::Sine,
    };
    let table = integrate(&config).expect("table");

    assert_eq!(table.table.len(), 6);
    for (i, line) in table.table.iter().enumerate() {
        assert_eq!(line.len(), i + 1);
    }
    // First entry is the plain trapezoid rule: (sin 0 + sin pi) / 2 * pi.
    assert!(table.table[0][0].abs() < 1e-12);
    // Second row starts with the midpoint refinement: (0 + pi * sin(pi/2)) / 2.
    assert!((table.table[1][0] - PI / 2.0).abs() < 1e-12);
    assert!((table.estimate - 2.0).abs() < 1e-9, "estimate {}", table.estimate);
    assert_eq!(table.converged_at, None);
}

#[test]
fn gaussian_converges_early() {
    let config = RombergConfig {
        lower: 0.0,
        upper: 1.0,
        rows: 20,
        tolerance: 1e-8,
        integrand: Integrand::Gaussian,
    };
    let table = integrate(&config).unwrap();

    let row = table.converged_at.expect("diagonal should settle");
    assert!(row > 3 && row < 20);
    assert_eq!(table.table.len(), row);
    // erf(1) / 2
    assert!((table.estimate - 0.421_350_396_474_857_5).abs() < 1e-8);
}

#[test]
fn single_row_is_trapezoid() {
    let config = RombergConfig {
        lower: 1.0,
        upper: 3.0,
        rows: 1,
        ..RombergConfig::default()
    };
    let table = integrate(&config).unwrap();
    let expected = (Integrand::Gaussian.eval(1.0) + Integrand::Gaussian.eval(3.0)) / 2.0 * 2.0;
    assert_eq!(table.table, vec![vec![expected]]);
    assert_eq!(table.estimate, expected);
}

#[test]
fn invalid_configs_are_rejected() {
    let inverted = RombergConfig {
        lower: 2.0,
        upper: 1.0,
        ..RombergConfig::default()
    };
    match integrate(&inverted).unwrap_err() {
        RombergError::Config(info) => assert_eq!(info.code, "inverted-limits"),
        other => panic!("unexpected error: {other:?}"),
    }

    let empty = RombergConfig {
        rows: 0,
        ..RombergConfig::default()
    };
    assert!(matches!(integrate(&empty), Err(RombergError::Config(_))));
}

#[test]
fn report_lists_every_row() {
    let config = RombergConfig {
        lower: 0.0,
        upper: PI,
        rows: 3,
        tolerance: 0.0,
        integrand: Integrand::Sine,
    };
    let table = integrate(&config).unwrap();
    let report = render_table(&table);

    assert!(report.starts_with("Initial Data:\n"));
    assert!(report.contains("Limits of integration = [  0.00000000,   3.14159265]"));
    assert!(report.contains("Number of rows =   3"));
    assert!(report.contains("  1.57079633  2.09439510"));
    assert!(!report.contains("Algorithm terminated"));
}

#[test]
fn converged_report_names_the_stopping_row() {
    let config = RombergConfig {
        lower: 0.0,
        upper: 1.0,
        rows: 20,
        tolerance: 1e-8,
        integrand: Integrand::Gaussian,
    };
    let table = integrate(&config).unwrap();
    let row = table.converged_at.expect("diagonal should settle");
    let report = render_table(&table);

    assert_eq!(report, table.to_string());
    assert!(report.contains("Last element not changing within"));
    assert!(report.contains(&format!("after {row} iterations")));
    assert_eq!(report.lines().filter(|line| line.starts_with(' ')).count(), row);
}
