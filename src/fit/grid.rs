//! Extrapolation grid generation.
//!
//! Fitted models are evaluated on a dense uniform grid that usually extends
//! well past the largest measured input size.

use crate::error::FitError;
use crate::math::linspace;

/// Uniform grid of `steps` points over `[min, max]` (inclusive).
pub fn extrapolation_grid(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, FitError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(FitError::malformed(format!(
            "Invalid extrapolation range: min={min}, max={max} (must be finite and max>min)."
        )));
    }
    if steps < 2 {
        return Err(FitError::malformed("Extrapolation steps must be >= 2."));
    }
    Ok(linspace(min, max, steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spans_range() {
        let g = extrapolation_grid(25_000.0, 500_000.0, 5).unwrap();
        assert_eq!(g, vec![25_000.0, 143_750.0, 262_500.0, 381_250.0, 500_000.0]);
    }

    #[test]
    fn grid_rejects_inverted_range() {
        assert!(matches!(
            extrapolation_grid(10.0, 1.0, 5),
            Err(FitError::MalformedInput(_))
        ));
        assert!(extrapolation_grid(1.0, 10.0, 1).is_err());
    }
}
