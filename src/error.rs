//! Error types.
//!
//! Library code returns [`FitError`], a small set of named failure kinds.
//! The binary boundary converts everything into [`AppError`], which carries the
//! process exit code:
//!
//! - `2`: malformed input or I/O failure
//! - `3`: not enough data to fit
//! - `4`: optimizer / runtime failure

use thiserror::Error;

/// Named failure kinds produced by loading, fitting and rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Input files, columns, values or ranges that cannot be used.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A series has fewer samples than the model has free parameters.
    #[error("Insufficient data for '{series}': need at least {needed} samples, got {got}")]
    InsufficientData {
        series: String,
        needed: usize,
        got: usize,
    },

    /// The optimizer exhausted its evaluation budget (or could not start).
    #[error("Fit for '{series}' did not converge after {evaluations} evaluations: {reason}")]
    Convergence {
        series: String,
        evaluations: usize,
        reason: String,
    },

    /// Filesystem, terminal or rendering failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl FitError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Exit code used when this error terminates the process.
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::MalformedInput(_) | FitError::Io(_) => 2,
            FitError::InsufficientData { .. } => 3,
            FitError::Convergence { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_error_maps_to_exit_codes() {
        let e: AppError = FitError::malformed("bad header").into();
        assert_eq!(e.exit_code(), 2);
        assert_eq!(e.to_string(), "Malformed input: bad header");

        let e: AppError = FitError::InsufficientData {
            series: "Bubble".to_string(),
            needed: 3,
            got: 2,
        }
        .into();
        assert_eq!(e.exit_code(), 3);

        let e: AppError = FitError::Convergence {
            series: "Quick".to_string(),
            evaluations: 10,
            reason: "budget exhausted".to_string(),
        }
        .into();
        assert_eq!(e.exit_code(), 4);
    }
}
