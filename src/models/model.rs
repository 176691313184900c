//! Model evaluation for the quadratic and log-linear growth forms.
//!
//! The fitter relies on two primitive operations:
//! - predict y(x) given parameters (for residuals/plots/extrapolation)
//! - fill a Jacobian row ∂y/∂p for a given x (for Levenberg–Marquardt)
//!
//! Log-domain guard: every log-family evaluation clamps `x` to at least
//! [`LOG_X_MIN`], during fitting and prediction alike. A non-positive scale
//! parameter still yields a non-finite value; callers treat that as a rejected
//! step (fitting) or a dropped point (rendering).

use crate::domain::{FitResult, ModelKind};

/// Lower clamp applied to `x` before any logarithm is taken.
pub const LOG_X_MIN: f64 = 1.0;

fn log_x(x: f64) -> f64 {
    x.max(LOG_X_MIN)
}

/// Predict `y(x)` for the given model kind.
///
/// # Panics
/// Panics if `params` is shorter than `model.param_len()`.
pub fn predict(model: ModelKind, x: f64, params: &[f64]) -> f64 {
    match model {
        ModelKind::Quadratic => {
            let (a, b, c) = (params[0], params[1], params[2]);
            a * x * x + b * x + c
        }
        ModelKind::LogLinear => {
            let (a, b, c) = (params[0], params[1], params[2]);
            let x = log_x(x);
            c * x * (a * x).ln() + b
        }
        ModelKind::LogRatio => {
            let (a, c, d, e) = (params[0], params[1], params[2], params[3]);
            let x = log_x(x);
            c * x * (a * x).ln() / (e * x).ln() + d
        }
    }
}

/// Fill the Jacobian row `∂y/∂pⱼ` at `x`.
///
/// # Panics
/// Panics if `params` or `out` are shorter than `model.param_len()`.
pub fn fill_jacobian_row(model: ModelKind, x: f64, params: &[f64], out: &mut [f64]) {
    match model {
        ModelKind::Quadratic => {
            out[0] = x * x;
            out[1] = x;
            out[2] = 1.0;
        }
        ModelKind::LogLinear => {
            let (a, _b, c) = (params[0], params[1], params[2]);
            let x = log_x(x);
            out[0] = c * x / a;
            out[1] = 1.0;
            out[2] = x * (a * x).ln();
        }
        ModelKind::LogRatio => {
            let (a, c, _d, e) = (params[0], params[1], params[2], params[3]);
            let x = log_x(x);
            let num = (a * x).ln();
            let den = (e * x).ln();
            out[0] = c * x / (a * den);
            out[1] = x * num / den;
            out[2] = 1.0;
            out[3] = -c * x * num / (e * den * den);
        }
    }
}

/// Evaluate a fitted model over `xs`, returning `(x, y)` pairs in order.
pub fn predict_curve(fit: &FitResult, xs: &[f64]) -> Vec<(f64, f64)> {
    xs.iter().map(|&x| (x, predict(fit.model, x, &fit.params))).collect()
}
