use crate::config::AnalysisConfig;
use crate::data::model::{Brew, BrewLog};

use super::target::{DataPoint, TargetResult, compute_target_with};
use super::Axis;

/// Points and sweet spot for one axis over a set of brews.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub axis: Axis,
    pub points: Vec<DataPoint>,
    pub target: TargetResult,
}

impl Analysis {
    /// Lower and upper edge of the shaded band.
    pub fn band(&self) -> (f64, f64) {
        let half = self.target.band_width / 2.0;
        (self.target.target - half, self.target.target + half)
    }
}

/// The (axis value, rating) point for one brew, or `None` when either is
/// missing or non-finite. The plot and the estimator both go through this.
pub fn brew_point(brew: &Brew, axis: Axis) -> Option<DataPoint> {
    let x = axis.value(brew)?;
    let y = brew.rating?;
    (x.is_finite() && y.is_finite()).then(|| DataPoint::new(x, y))
}

/// Build points for the brews at `indices`, skipping those without one.
pub fn points(log: &BrewLog, indices: &[usize], axis: Axis) -> Vec<DataPoint> {
    indices
        .iter()
        .filter_map(|&i| brew_point(log.brews.get(i)?, axis))
        .collect()
}

pub fn analyze(log: &BrewLog, indices: &[usize], axis: Axis, config: &AnalysisConfig) -> Analysis {
    let points = points(log, indices, axis);
    let fallback = config.fallback(axis);
    let target = compute_target_with(&points, fallback.target, fallback.band_width, &config.target);
    log::debug!(
        "{} points on {:?}: target {:.2} ± {:.2}",
        points.len(),
        axis,
        target.target,
        target.band_width / 2.0
    );
    Analysis {
        axis,
        points,
        target,
    }
}
