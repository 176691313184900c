//! Uniform grids and piecewise-linear interpolation.

use crate::domain::Sample;

/// `steps` evenly spaced values from `min` to `max` (both inclusive).
///
/// `steps == 0` gives an empty grid and `steps == 1` gives `[min]`.
pub fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (steps as f64 - 1.0);
            let mut out: Vec<f64> = (0..steps).map(|i| min + step * i as f64).collect();
            // Pin the last point so rounding never overshoots the range.
            if let Some(last) = out.last_mut() {
                *last = max;
            }
            out
        }
    }
}

/// Merge samples sharing the same `x` into one sample with the mean `y`.
///
/// Input must be sorted by `x`; output is strictly increasing in `x`.
pub fn dedup_mean(samples: &[Sample]) -> Vec<Sample> {
    let mut out: Vec<Sample> = Vec::with_capacity(samples.len());
    let mut count = 0usize;
    for s in samples {
        match out.last_mut() {
            Some(last) if last.x == s.x => {
                count += 1;
                // Running mean keeps the merge single-pass.
                last.y += (s.y - last.y) / count as f64;
            }
            _ => {
                out.push(*s);
                count = 1;
            }
        }
    }
    out
}

/// Piecewise-linear interpolation of `points` at `x`.
///
/// `points` must be strictly increasing in `x` and non-empty. Values outside
/// the sampled range are clamped to the first/last `y`.
pub fn interp(points: &[Sample], x: f64) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return f64::NAN;
    };
    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }

    // First index with points[i].x > x; x is strictly inside so 1 <= i < len.
    let i = points.partition_point(|p| p.x <= x);
    let lo = points[i - 1];
    let hi = points[i];
    let u = (x - lo.x) / (hi.x - lo.x);
    lo.y + u * (hi.y - lo.y)
}

/// Resample a sorted series onto `steps` uniform points over `[min(x), max(x)]`.
///
/// Duplicate `x` values are averaged first. Returns `None` when fewer than two
/// distinct `x` values remain.
pub fn resample_uniform(samples: &[Sample], steps: usize) -> Option<Vec<Sample>> {
    let unique = dedup_mean(samples);
    if unique.len() < 2 {
        return None;
    }
    let x0 = unique[0].x;
    let x1 = unique[unique.len() - 1].x;
    Some(
        linspace(x0, x1, steps)
            .into_iter()
            .map(|x| Sample::new(x, interp(&unique, x)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(25_000.0, 500_000.0, 5_000);
        assert_eq!(v.len(), 5_000);
        assert_eq!(v[0], 25_000.0);
        assert_eq!(v[4_999], 500_000.0);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn interp_is_linear_between_knots_and_clamped_outside() {
        let pts = [Sample::new(0.0, 0.0), Sample::new(10.0, 100.0), Sample::new(20.0, 0.0)];
        assert_relative_eq!(interp(&pts, 5.0), 50.0);
        assert_relative_eq!(interp(&pts, 15.0), 50.0);
        assert_relative_eq!(interp(&pts, 10.0), 100.0);
        assert_relative_eq!(interp(&pts, -1.0), 0.0);
        assert_relative_eq!(interp(&pts, 25.0), 0.0);
    }

    #[test]
    fn dedup_averages_duplicate_x() {
        let pts = [
            Sample::new(1.0, 10.0),
            Sample::new(2.0, 20.0),
            Sample::new(2.0, 40.0),
            Sample::new(2.0, 60.0),
            Sample::new(3.0, 30.0),
        ];
        let out = dedup_mean(&pts);
        assert_eq!(out.len(), 3);
        assert_relative_eq!(out[1].y, 40.0);
    }

    #[test]
    fn resample_tolerates_duplicates() {
        let pts = [
            Sample::new(100.0, 1.0),
            Sample::new(100.0, 3.0),
            Sample::new(200.0, 4.0),
            Sample::new(300.0, 9.0),
        ];
        let out = resample_uniform(&pts, 100).unwrap();
        assert_eq!(out.len(), 100);
        assert_relative_eq!(out[0].x, 100.0);
        assert_relative_eq!(out[0].y, 2.0);
        assert_relative_eq!(out[99].x, 300.0);
        assert_relative_eq!(out[99].y, 9.0);
        assert!(out.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn resample_needs_two_distinct_x() {
        let pts = [Sample::new(5.0, 1.0), Sample::new(5.0, 2.0)];
        assert!(resample_uniform(&pts, 100).is_none());
    }
}
