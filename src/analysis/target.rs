use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inputs / outputs
// ---------------------------------------------------------------------------

/// One brew on the scatter plot: `x` is the brew parameter (ratio or brew
/// time in seconds), `y` is its rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Recommended x value and the width of the shaded band around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetResult {
    pub target: f64,
    pub band_width: f64,
}

/// Tuning knobs for [`compute_target_with`].
///
/// `Default` gives the standard estimator: top quartile of ratings, at least
/// three top brews, band spanning the 10th–90th percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    /// Rating quantile a brew must reach to count as a top performer.
    pub top_quantile: f64,
    /// Below this many top performers the whole point set is used instead.
    pub min_pool: usize,
    /// Lower quantile of the band.
    pub band_low: f64,
    /// Upper quantile of the band.
    pub band_high: f64,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            top_quantile: 0.75,
            min_pool: 3,
            band_low: 0.10,
            band_high: 0.90,
        }
    }
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

/// Estimate the sweet-spot x value from the best-rated brews.
pub fn compute_target(
    points: &[DataPoint],
    fallback_target: f64,
    fallback_band_width: f64,
) -> TargetResult {
    compute_target_with(
        points,
        fallback_target,
        fallback_band_width,
        &TargetParams::default(),
    )
}

/// [`compute_target`] with explicit thresholds.
///
/// The band is never narrower than `fallback_band_width`, so sparse data
/// cannot produce a deceptively tight band.
pub fn compute_target_with(
    points: &[DataPoint],
    fallback_target: f64,
    fallback_band_width: f64,
    params: &TargetParams,
) -> TargetResult {
    if points.is_empty() {
        return TargetResult {
            target: fallback_target,
            band_width: fallback_band_width,
        };
    }

    let ratings: Vec<f64> = points.iter().map(|p| p.y).collect();
    let threshold = percentile(&ratings, params.top_quantile).unwrap_or(f64::NEG_INFINITY);

    let top: Vec<&DataPoint> = points.iter().filter(|p| p.y >= threshold).collect();
    let pool: Vec<f64> = if top.len() < params.min_pool {
        points.iter().map(|p| p.x).collect()
    } else {
        top.iter().map(|p| p.x).collect()
    };

    let target = median(&pool).unwrap_or(fallback_target);

    let spread = match (
        percentile(&pool, params.band_low),
        percentile(&pool, params.band_high),
    ) {
        (Some(lo), Some(hi)) => hi - lo,
        _ => 0.0,
    };

    TargetResult {
        target,
        band_width: spread.max(fallback_band_width),
    }
}

// ---------------------------------------------------------------------------
// Order statistics
// ---------------------------------------------------------------------------

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

/// Linear-interpolation percentile; `q` is a fraction in `[0, 1]`.
///
/// Returns `None` for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let v = sorted(values);
    let rank = (v.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(v[lo] + (v[hi] - v[lo]) * frac)
}

/// Middle value, or the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let v = sorted(values);
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) / 2.0)
    } else {
        Some(v[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<DataPoint> {
        raw.iter().map(|&(x, y)| DataPoint::new(x, y)).collect()
    }

    #[test]
    fn test_empty_returns_fallbacks() {
        let r = compute_target(&[], 2.0, 0.5);
        assert_eq!(
            r,
            TargetResult {
                target: 2.0,
                band_width: 0.5
            }
        );
    }

    #[test]
    fn test_single_point_collapses_to_fallback_band() {
        let r = compute_target(&pts(&[(5.0, 3.0)]), 2.0, 0.5);
        assert_eq!(r.target, 5.0);
        assert_eq!(r.band_width, 0.5);
    }

    #[test]
    fn test_equal_ratings_use_full_set_median() {
        let r = compute_target(&pts(&[(1.0, 7.0), (2.0, 7.0), (3.0, 7.0), (4.0, 7.0)]), 0.0, 0.1);
        assert_eq!(r.target, 2.5);
        // p10 = 1.3, p90 = 3.7
        assert!((r.band_width - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_top_performers_drive_target() {
        // Ratings 1..=8 at x = 1..=8.
        let raw: Vec<(f64, f64)> = (1..=8).map(|i| (i as f64, i as f64)).collect();
        let r = compute_target(&pts(&raw), 0.0, 0.0);
        // p75 of 1..=8 is 6.25 → only 7 and 8 qualify, fewer than 3 → full set.
        assert_eq!(r.target, 4.5);

        let raw = [(2.0, 9.0), (2.2, 9.0), (2.4, 9.0), (1.0, 2.0), (3.5, 1.0)];
        let r = compute_target(&pts(&raw), 0.0, 0.0);
        // p75 of ratings = 9.0, ties included → pool is the three 9s.
        assert!((r.target - 2.2).abs() < 1e-9);
        assert!((r.band_width - 0.32).abs() < 1e-9);
    }

    #[test]
    fn test_band_never_narrower_than_fallback() {
        let raw = [(2.0, 8.0), (2.01, 8.0), (2.02, 8.0), (2.03, 8.0)];
        let r = compute_target(&pts(&raw), 0.0, 0.5);
        assert_eq!(r.band_width, 0.5);

        let wide = [(1.0, 8.0), (2.0, 8.0), (3.0, 8.0), (9.0, 8.0)];
        let r = compute_target(&pts(&wide), 0.0, 0.5);
        assert!(r.band_width > 0.5);
    }

    #[test]
    fn test_moving_a_point_outward_never_narrows_band() {
        let base = [(1.0, 5.0), (2.0, 5.0), (3.0, 5.0), (4.0, 5.0), (5.0, 5.0)];
        let before = compute_target(&pts(&base), 0.0, 0.0);
        let mut moved = base;
        moved[4].0 = 6.0;
        let after = compute_target(&pts(&moved), 0.0, 0.0);
        assert!(after.band_width >= before.band_width);
    }

    #[test]
    fn test_repeated_calls_match() {
        let raw = pts(&[(1.8, 6.0), (2.1, 8.5), (2.4, 7.0), (2.0, 9.0), (2.6, 4.0)]);
        assert_eq!(compute_target(&raw, 2.0, 0.5), compute_target(&raw, 2.0, 0.5));
    }

    #[test]
    fn test_custom_params() {
        let raw = [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 10.0)];
        let params = TargetParams {
            min_pool: 1,
            ..TargetParams::default()
        };
        let r = compute_target_with(&pts(&raw), 0.0, 0.0, &params);
        assert_eq!(r.target, 4.0);
        assert_eq!(r.band_width, 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&v, 0.0), Some(1.0));
        assert_eq!(percentile(&v, 1.0), Some(4.0));
        assert_eq!(percentile(&v, 0.5), Some(2.5));
        assert!((percentile(&v, 0.75).unwrap() - 3.25).abs() < 1e-12);
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }
}
