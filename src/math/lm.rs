//! Levenberg–Marquardt nonlinear least squares.
//!
//! Minimizes `Σ rᵢ(p)²` for a residual function `r` with an analytic Jacobian.
//!
//! Implementation notes:
//! - Jacobian columns are scaled to unit norm before each step (Marquardt
//!   scaling), so parameters of very different magnitude (`a` for `x²` vs `c`
//!   for the constant term) are damped evenly.
//! - Each trial step solves the damped problem as an augmented linear least
//!   squares system with [`solve_least_squares`].
//! - Steps that produce a non-finite cost are rejected like any uphill step.
//! - Termination follows the usual MINPACK-style tests on relative cost
//!   reduction (`ftol`), relative step size (`xtol`) and the gradient cosine
//!   (`gtol`).

use nalgebra::{DMatrix, DVector};

use crate::math::solve_least_squares;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e16;

/// Optimizer settings.
#[derive(Debug, Clone, Copy)]
pub struct LmOptions {
    /// Maximum number of residual evaluations (including the initial one).
    pub max_evaluations: usize,
    pub ftol: f64,
    pub xtol: f64,
    pub gtol: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_evaluations: 50_000,
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: 1e-12,
        }
    }
}

/// Why the optimizer stopped successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LmStop {
    ZeroResidual,
    CostTolerance,
    StepTolerance,
    GradientTolerance,
}

/// Successful minimization.
#[derive(Debug, Clone)]
pub struct LmReport {
    pub params: Vec<f64>,
    /// Sum of squared residuals at `params`.
    pub cost: f64,
    pub evaluations: usize,
    pub iterations: usize,
    pub stop: LmStop,
}

/// Failed minimization.
#[derive(Debug, Clone, PartialEq)]
pub enum LmFailure {
    /// The residuals (or Jacobian) were not finite where the optimizer needed them.
    NonFinite { evaluations: usize },
    /// The evaluation budget was exhausted before any stopping test passed.
    BudgetExhausted { evaluations: usize },
    /// Damping grew without bound and no step could be taken.
    Stalled { evaluations: usize },
}

impl LmFailure {
    pub fn evaluations(&self) -> usize {
        match self {
            LmFailure::NonFinite { evaluations }
            | LmFailure::BudgetExhausted { evaluations }
            | LmFailure::Stalled { evaluations } => *evaluations,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            LmFailure::NonFinite { .. } => "non-finite residuals or Jacobian",
            LmFailure::BudgetExhausted { .. } => "evaluation budget exhausted",
            LmFailure::Stalled { .. } => "damping exhausted without an improving step",
        }
    }
}

/// Minimize `Σ rᵢ(p)²` starting at `p0`.
///
/// - `residuals(p, out)` writes the `n` residuals for parameters `p`.
/// - `jacobian(p, out)` writes the `n × p0.len()` Jacobian `∂rᵢ/∂pⱼ`.
pub fn minimize<R, J>(
    p0: &[f64],
    n: usize,
    residuals: R,
    jacobian: J,
    opts: &LmOptions,
) -> Result<LmReport, LmFailure>
where
    R: Fn(&[f64], &mut [f64]),
    J: Fn(&[f64], &mut DMatrix<f64>),
{
    let m = p0.len();
    let mut p = DVector::from_column_slice(p0);
    let mut r = DVector::<f64>::zeros(n);

    if opts.max_evaluations == 0 {
        return Err(LmFailure::BudgetExhausted { evaluations: 0 });
    }
    residuals(p.as_slice(), r.as_mut_slice());
    let mut evaluations = 1usize;
    let mut cost = r.norm_squared();
    if !cost.is_finite() {
        return Err(LmFailure::NonFinite { evaluations });
    }

    let mut jac = DMatrix::<f64>::zeros(n, m);
    let mut r_trial = DVector::<f64>::zeros(n);
    let mut lambda = LAMBDA_INIT;
    let mut iterations = 0usize;

    loop {
        if cost == 0.0 {
            return Ok(report(&p, cost, evaluations, iterations, LmStop::ZeroResidual));
        }

        jacobian(p.as_slice(), &mut jac);
        if jac.iter().any(|v| !v.is_finite()) {
            return Err(LmFailure::NonFinite { evaluations });
        }

        // Column scaling: js = J · S⁻¹ with S = diag(‖Jⱼ‖).
        let scale: Vec<f64> = (0..m)
            .map(|j| {
                let s = jac.column(j).norm();
                if s > 0.0 && s.is_finite() { s } else { 1.0 }
            })
            .collect();
        let mut js = jac.clone();
        for (j, &s) in scale.iter().enumerate() {
            js.column_mut(j).scale_mut(1.0 / s);
        }

        // Gradient test: max cosine between r and a scaled Jacobian column.
        let grad = js.transpose() * &r;
        let r_norm = cost.sqrt();
        let gnorm = grad.iter().fold(0.0_f64, |acc, g| acc.max(g.abs())) / r_norm;
        if gnorm <= opts.gtol {
            return Ok(report(&p, cost, evaluations, iterations, LmStop::GradientTolerance));
        }

        let p_scaled_norm = p
            .iter()
            .zip(scale.iter())
            .map(|(v, s)| (v * s) * (v * s))
            .sum::<f64>()
            .sqrt();

        // Inner loop: raise damping until a step decreases the cost.
        loop {
            if evaluations >= opts.max_evaluations {
                return Err(LmFailure::BudgetExhausted { evaluations });
            }
            if lambda > LAMBDA_MAX {
                return Err(LmFailure::Stalled { evaluations });
            }

            let (a, b) = augmented_system(&js, &r, lambda);
            let Some(step_scaled) = solve_least_squares(&a, &b) else {
                lambda *= 10.0;
                continue;
            };

            let mut p_trial = p.clone();
            for j in 0..m {
                p_trial[j] += step_scaled[j] / scale[j];
            }

            residuals(p_trial.as_slice(), r_trial.as_mut_slice());
            evaluations += 1;
            let cost_trial = r_trial.norm_squared();

            let step_norm = step_scaled.norm();
            let step_small = step_norm <= opts.xtol * (p_scaled_norm + opts.xtol);

            if cost_trial.is_finite() && cost_trial < cost {
                let predicted = {
                    let jd = &js * &step_scaled;
                    (jd.norm_squared() + 2.0 * lambda * step_norm * step_norm) / cost
                };
                let actual = (cost - cost_trial) / cost;

                p = p_trial;
                std::mem::swap(&mut r, &mut r_trial);
                cost = cost_trial;
                lambda = (lambda * 0.1).max(LAMBDA_MIN);
                iterations += 1;

                if actual <= opts.ftol && predicted <= opts.ftol {
                    return Ok(report(&p, cost, evaluations, iterations, LmStop::CostTolerance));
                }
                if step_small {
                    return Ok(report(&p, cost, evaluations, iterations, LmStop::StepTolerance));
                }
                break;
            }

            if step_small {
                return Ok(report(&p, cost, evaluations, iterations, LmStop::StepTolerance));
            }
            lambda *= 10.0;
        }
    }
}

fn augmented_system(js: &DMatrix<f64>, r: &DVector<f64>, lambda: f64) -> (DMatrix<f64>, DVector<f64>) {
    let n = js.nrows();
    let m = js.ncols();
    let damping = lambda.sqrt();

    let mut a = DMatrix::<f64>::zeros(n + m, m);
    a.view_mut((0, 0), (n, m)).copy_from(js);
    for j in 0..m {
        a[(n + j, j)] = damping;
    }

    let mut b = DVector::<f64>::zeros(n + m);
    for i in 0..n {
        b[i] = -r[i];
    }
    (a, b)
}

fn report(p: &DVector<f64>, cost: f64, evaluations: usize, iterations: usize, stop: LmStop) -> LmReport {
    LmReport {
        params: p.iter().copied().collect(),
        cost,
        evaluations,
        iterations,
        stop,
    }
}
