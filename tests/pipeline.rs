use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use bench_curves::app::pipeline::run_fit;
use bench_curves::domain::{FitConfig, GrowthFamily, ModelKind};
use bench_curves::error::{AppError, FitError};
use bench_curves::io::{read_curves_json, write_curves_json, write_params_csv};
use bench_curves::plot::{AxisScale, fitted_view, observed_view};
use bench_curves::report::format_fit_summary;
use tempfile::tempdir;

fn write_series(dir: &Path, name: &str, xs: impl Iterator<Item = f64>, f: impl Fn(f64) -> f64) {
    let mut body = String::from("X, Y\n");
    for x in xs {
        writeln!(body, "{x},{}", f(x)).unwrap();
    }
    fs::write(dir.join(format!("{name}.csv")), body).unwrap();
}

#[test]
fn fit_pipeline_end_to_end() {
    let dir = tempdir().unwrap();
    let quad = |x: f64| 2.0 * x * x + 3.0 * x + 5.0;
    let nlogn = |x: f64| x * (2.0 * x).ln();

    // Reverse order on disk; the loader sorts by x.
    write_series(dir.path(), "Bubble", (1..=30).rev().map(f64::from), quad);
    write_series(dir.path(), "Quick", (1..=40).map(f64::from), nlogn);
    write_series(dir.path(), "Insertion Almost Sorted", (1..=10).map(f64::from), |x| x);

    let config = FitConfig {
        input_dir: dir.path().to_path_buf(),
        extrapolate_min: 50.0,
        extrapolate_max: 100.0,
        extrapolate_steps: 11,
        ..FitConfig::default()
    };

    let run = run_fit(&config).unwrap();
    assert_eq!(run.loaded.files_found, 3);
    assert_eq!(run.loaded.excluded, vec!["Insertion Almost Sorted".to_string()]);
    assert!(run.batch.failures.is_empty());
    assert_eq!(run.grid.len(), 11);

    let bubble = &run.batch.fits[0];
    assert_eq!(bubble.series, "Bubble");
    assert_eq!(bubble.model, ModelKind::Quadratic);
    assert_relative_eq!(bubble.params[0], 2.0, epsilon = 1e-6);
    assert_relative_eq!(bubble.params[1], 3.0, epsilon = 1e-6);
    assert_relative_eq!(bubble.params[2], 5.0, epsilon = 1e-6);

    let quick = &run.batch.fits[1];
    assert_eq!(quick.family(), GrowthFamily::LogLinear);

    // Excluded series never reaches a plot.
    let view = fitted_view(&run.loaded.series, &run.batch.fits, &run.grid);
    assert!(view.layers().iter().all(|l| !l.label.contains("Almost")));
    assert_eq!(view.layers().len(), 4);

    let log_plot = observed_view(&run.loaded.series, AxisScale::Log).render_ascii(40, 10);
    assert!(log_plot.contains("  * Bubble\n"));
    assert!(log_plot.contains("  o Quick\n"));

    let summary = format_fit_summary(&run.loaded, &run.batch, &config);
    assert!(summary.contains("Excluded: Insertion Almost Sorted"));

    // Exports round-trip through disk.
    let params = dir.path().join("out-params.csv");
    write_params_csv(&params, &run.batch.fits).unwrap();
    let rows = fs::read_to_string(&params).unwrap();
    assert_eq!(rows.lines().count(), 3);

    let curves_path = dir.path().join("out-curves.json");
    write_curves_json(&curves_path, &run.batch.fits, &run.grid).unwrap();
    let curves = read_curves_json(&curves_path).unwrap();
    assert_eq!(curves.curves.len(), 2);
    let q = &curves.curves[1];
    assert_eq!(q.grid.x.len(), 11);
    for (x, y) in q.grid.x.iter().zip(&q.grid.y) {
        assert_relative_eq!(*y, nlogn(*x), max_relative = 1e-4);
    }
}

#[test]
fn undersized_directory_exits_with_insufficient_data() {
    let dir = tempdir().unwrap();
    write_series(dir.path(), "Std", (1..=2).map(f64::from), |x| x);

    let config = FitConfig {
        input_dir: dir.path().to_path_buf(),
        ..FitConfig::default()
    };
    let err = run_fit(&config).unwrap_err();
    assert!(matches!(err, FitError::InsufficientData { .. }));
    assert_eq!(AppError::from(err).exit_code(), 3);
}

#[test]
fn malformed_csv_exits_with_input_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Bubble.csv"), "X,Y\n1,2\n2,oops\n").unwrap();

    let config = FitConfig {
        input_dir: dir.path().to_path_buf(),
        ..FitConfig::default()
    };
    let err = run_fit(&config).unwrap_err();
    assert_eq!(AppError::from(err).exit_code(), 2);
}
