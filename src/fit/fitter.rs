//! Per-series curve fitting.
//!
//! Given a classified [`Series`] we:
//! - check it has at least as many samples as the model has parameters
//! - optionally resample it onto a uniform grid (linear interpolation)
//! - run Levenberg–Marquardt from an all-ones starting point
//!
//! Series are independent, so [`fit_all`] fits them in parallel and returns
//! results in input order.

use nalgebra::DMatrix;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{FitConfig, FitQuality, FitResult, LogForm, ModelKind, Sample, Series};
use crate::error::FitError;
use crate::math::{LmOptions, dedup_mean, minimize, resample_uniform};
use crate::models::{fill_jacobian_row, predict};

/// Fitting options that affect how each series is calibrated.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Concrete form used for the log-linear family.
    pub log_form: LogForm,
    /// Resample onto this many uniform points before fitting.
    pub resample: Option<usize>,
    pub lm: LmOptions,
}

impl FitOptions {
    pub fn from_config(config: &FitConfig) -> Self {
        Self {
            log_form: config.log_form,
            resample: config.resample.then_some(config.resample_points),
            lm: LmOptions {
                max_evaluations: config.max_evaluations,
                ..LmOptions::default()
            },
        }
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self::from_config(&FitConfig::default())
    }
}

/// Outcome of fitting a batch of series.
#[derive(Debug, Clone, Default)]
pub struct FitBatch {
    pub fits: Vec<FitResult>,
    /// Series that failed to fit, with the reason.
    pub failures: Vec<(String, FitError)>,
}

/// Fit every series with the model of its family, in parallel.
pub fn fit_all(series: &[Series], opts: &FitOptions) -> FitBatch {
    let outcomes: Vec<(String, Result<FitResult, FitError>)> = series
        .par_iter()
        .map(|s| (s.name.clone(), fit_series(s, s.family.model(opts.log_form), opts)))
        .collect();

    let mut batch = FitBatch::default();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(fit) => batch.fits.push(fit),
            Err(err) => {
                warn!(series = %name, error = %err, "fit failed");
                batch.failures.push((name, err));
            }
        }
    }
    batch
}

/// Fit one series with the given model.
pub fn fit_series(series: &Series, model: ModelKind, opts: &FitOptions) -> Result<FitResult, FitError> {
    let needed = model.param_len();
    if series.len() < needed {
        return Err(FitError::InsufficientData {
            series: series.name.clone(),
            needed,
            got: series.len(),
        });
    }
    if series.samples.iter().any(|s| !(s.x.is_finite() && s.y.is_finite())) {
        return Err(FitError::malformed(format!(
            "Series '{}' contains non-finite samples.",
            series.name
        )));
    }

    let samples: Vec<Sample> = match opts.resample {
        None => series.samples.clone(),
        Some(points) => {
            let resampled = resample_uniform(&series.samples, points).ok_or_else(|| {
                FitError::InsufficientData {
                    series: series.name.clone(),
                    needed,
                    got: dedup_mean(&series.samples).len(),
                }
            })?;
            if resampled.len() < needed {
                return Err(FitError::InsufficientData {
                    series: series.name.clone(),
                    needed,
                    got: resampled.len(),
                });
            }
            resampled
        }
    };

    let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
    let ys: Vec<f64> = samples.iter().map(|s| s.y).collect();
    let n = xs.len();

    let report = minimize(
        &vec![1.0; needed],
        n,
        |p, out| {
            for i in 0..n {
                out[i] = predict(model, xs[i], p) - ys[i];
            }
        },
        |p, jac: &mut DMatrix<f64>| {
            let mut row = vec![0.0; needed];
            for i in 0..n {
                fill_jacobian_row(model, xs[i], p, &mut row);
                for (j, v) in row.iter().enumerate() {
                    jac[(i, j)] = *v;
                }
            }
        },
        &opts.lm,
    )
    .map_err(|failure| FitError::Convergence {
        series: series.name.clone(),
        evaluations: failure.evaluations(),
        reason: failure.reason().to_string(),
    })?;

    debug!(
        series = %series.name,
        model = model.display_name(),
        evaluations = report.evaluations,
        iterations = report.iterations,
        stop = ?report.stop,
        "fit converged"
    );

    let sse = report.cost;
    Ok(FitResult {
        series: series.name.clone(),
        model,
        params: report.params,
        quality: FitQuality {
            sse,
            rmse: (sse / n as f64).sqrt(),
            n,
            evaluations: report.evaluations,
            resampled: opts.resample.is_some(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GrowthFamily;
    use crate::models::predict_curve;
    use approx::assert_relative_eq;

    fn series_from(name: &str, family: GrowthFamily, xs: &[f64], f: impl Fn(f64) -> f64) -> Series {
        Series::new(name, family, xs.iter().map(|&x| Sample::new(x, f(x))).collect())
    }

    #[test]
    fn quadratic_round_trip_recovers_parameters() {
        let xs: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let s = series_from("Bubble", GrowthFamily::Quadratic, &xs, |x| 2.0 * x * x + 3.0 * x + 5.0);

        let fit = fit_series(&s, ModelKind::Quadratic, &FitOptions::default()).unwrap();
        assert_relative_eq!(fit.params[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(fit.params[1], 3.0, epsilon = 1e-6);
        assert_relative_eq!(fit.params[2], 5.0, epsilon = 1e-6);
        assert!(fit.quality.sse < 1e-9);
        assert!(!fit.quality.resampled);
    }

    #[test]
    fn log_linear_round_trip_reproduces_curve() {
        let xs: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let truth = |x: f64| x * (2.0 * x).ln();
        let s = series_from("Quick", GrowthFamily::LogLinear, &xs, truth);

        let fit = fit_series(&s, ModelKind::LogLinear, &FitOptions::default()).unwrap();
        for (x, y) in predict_curve(&fit, &xs) {
            assert_relative_eq!(y, truth(x), max_relative = 1e-6, epsilon = 1e-6);
        }
    }

    #[test]
    fn log_ratio_round_trip_reproduces_curve() {
        let xs: Vec<f64> = (2..=40).map(|i| i as f64).collect();
        let truth = |x: f64| x * (2.0 * x).ln() / (1.5 * x).ln();
        let s = series_from("Quick", GrowthFamily::LogLinear, &xs, truth);

        let fit = fit_series(&s, ModelKind::LogRatio, &FitOptions::default()).unwrap();
        assert_eq!(fit.params.len(), 4);
        for (x, y) in predict_curve(&fit, &xs) {
            assert_relative_eq!(y, truth(x), max_relative = 1e-6, epsilon = 1e-6);
        }
    }

    #[test]
    fn log_ratio_cannot_start_at_x_one() {
        // a = e = 1 at the start, so ln(e·x) = 0 for any clamped x <= 1.
        let xs = [0.5, 2.0, 3.0, 4.0, 5.0];
        let s = series_from("Std", GrowthFamily::LogLinear, &xs, |x| x);

        let err = fit_series(&s, ModelKind::LogRatio, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::Convergence { evaluations: 1, .. }), "{err}");
    }

    #[test]
    fn resampled_fit_uses_uniform_grid() {
        // Irregular spacing (step 1 then 2) with a duplicated x.
        let mut xs: Vec<f64> = (1..=10).chain((12..=50).step_by(2)).map(|i| i as f64).collect();
        xs.push(2.0);
        let s = series_from("Selection", GrowthFamily::Quadratic, &xs, |x| x * x);

        let opts = FitOptions {
            resample: Some(100),
            ..FitOptions::default()
        };
        let fit = fit_series(&s, ModelKind::Quadratic, &opts).unwrap();
        assert_eq!(fit.quality.n, 100);
        assert!(fit.quality.resampled);

        // Chords over x² overshoot by at most h²/4 = 1 on the widest gaps.
        assert_relative_eq!(fit.params[0], 1.0, epsilon = 1e-2);
        for (x, y) in predict_curve(&fit, &xs) {
            assert!((y - x * x).abs() < 2.0, "x={x}: {y} vs {}", x * x);
        }
    }

    #[test]
    fn too_few_samples_is_insufficient_data() {
        let s = series_from("Bubble", GrowthFamily::Quadratic, &[1.0, 2.0], |x| x);
        let err = fit_series(&s, ModelKind::Quadratic, &FitOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FitError::InsufficientData {
                series: "Bubble".to_string(),
                needed: 3,
                got: 2
            }
        );

        let s = series_from("Quick", GrowthFamily::LogLinear, &[2.0, 3.0, 4.0], |x| x);
        let err = fit_series(&s, ModelKind::LogRatio, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::InsufficientData { needed: 4, got: 3, .. }));
    }

    #[test]
    fn resampling_a_single_distinct_x_is_insufficient_data() {
        let s = series_from("Bubble", GrowthFamily::Quadratic, &[5.0, 5.0, 5.0], |_| 1.0);
        let opts = FitOptions {
            resample: Some(100),
            ..FitOptions::default()
        };
        let err = fit_series(&s, ModelKind::Quadratic, &opts).unwrap_err();
        assert!(matches!(err, FitError::InsufficientData { got: 1, .. }));
    }

    #[test]
    fn exhausted_budget_is_convergence_error() {
        let xs: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let s = series_from("Bubble", GrowthFamily::Quadratic, &xs, |x| 7.0 * x * x);
        let mut opts = FitOptions::default();
        opts.lm.max_evaluations = 1;

        let err = fit_series(&s, ModelKind::Quadratic, &opts).unwrap_err();
        assert!(matches!(err, FitError::Convergence { evaluations: 1, .. }));
    }

    #[test]
    fn fit_all_keeps_input_order_and_collects_failures() {
        let xs: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let series = vec![
            series_from("Bubble", GrowthFamily::Quadratic, &xs, |x| x * x),
            series_from("Tiny", GrowthFamily::Quadratic, &[1.0], |x| x),
            series_from("Std", GrowthFamily::LogLinear, &xs, |x| 3.0 * x * x.ln() + 1.0),
        ];

        let batch = fit_all(&series, &FitOptions::default());
        let names: Vec<&str> = batch.fits.iter().map(|f| f.series.as_str()).collect();
        assert_eq!(names, vec!["Bubble", "Std"]);
        assert_eq!(batch.fits[1].model, ModelKind::LogLinear);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].0, "Tiny");
    }
}
