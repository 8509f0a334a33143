/// Analysis layer: brew parameters vs rating.
///
/// ```text
///   BrewLog + visible indices
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  axis value + rating → DataPoints (finite only)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  target   │  top-rated median + percentile band → TargetResult
///   └──────────┘
/// ```

pub mod series;
pub mod target;

use serde::{Deserialize, Serialize};

use crate::data::model::Brew;

/// Brew parameter plotted on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    Ratio,
    BrewTime,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Ratio, Axis::BrewTime];

    pub fn label(self) -> &'static str {
        match self {
            Axis::Ratio => "Ratio (1:x)",
            Axis::BrewTime => "Brew time (s)",
        }
    }

    pub fn value(self, brew: &Brew) -> Option<f64> {
        match self {
            Axis::Ratio => brew.ratio(),
            Axis::BrewTime => brew.brew_time,
        }
    }
}
