// Reference population data supplied by the warehouse collaborator.
//
// The crate never runs warehouse queries itself: callers hand it a
// `ReferenceSource` that materializes per-level aggregates on demand.
// Reference data being unavailable for a level is an expected condition,
// not an error; comparison fields simply stay empty downstream.

use crate::event::CompetitionLevel;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Aggregate shapes
// ---------------------------------------------------------------------------

/// Population-wide mean values for each core hitting metric at one level.
/// Individual metrics may be missing when the warehouse aggregate returned
/// no usable rows for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceAverages {
    pub avg_exit_velo: Option<f64>,
    pub percentile_90_exit_velo: Option<f64>,
    pub max_exit_velo: Option<f64>,
    pub barrel_rate: Option<f64>,
    pub hardhit_rate: Option<f64>,
    pub total_batted_balls: u64,
    pub total_batters: Option<u64>,
}

/// Per-batter metric value arrays for one level, used for percentile
/// ranking. One entry per qualified batter in the reference population.
///
/// The 90th-percentile values here are whatever quantile definition the
/// warehouse computed; the crate ranks against them as-is and never
/// recomputes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDistribution {
    pub avg_exit_velo: Vec<f64>,
    pub percentile_90_exit_velo: Vec<f64>,
    pub max_exit_velo: Vec<f64>,
    pub barrel_rate: Vec<f64>,
    pub hardhit_rate: Vec<f64>,
}

impl ReferenceDistribution {
    /// True when no metric has any population values.
    pub fn is_empty(&self) -> bool {
        self.avg_exit_velo.is_empty()
            && self.percentile_90_exit_velo.is_empty()
            && self.max_exit_velo.is_empty()
            && self.barrel_rate.is_empty()
            && self.hardhit_rate.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Collaborator contract
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("reference query for level {level} failed: {message}")]
    Query {
        level: CompetitionLevel,
        message: String,
    },
}

/// Boundary with the warehouse's reference-population aggregation. Each call
/// is an independent external read; implementations are not expected to
/// cache across calls.
pub trait ReferenceSource {
    /// Population mean per metric for the given level, or `None` when the
    /// level has no reference data.
    fn averages(
        &self,
        level: CompetitionLevel,
    ) -> Result<Option<ReferenceAverages>, ReferenceError>;

    /// Per-batter metric distributions for the given level, or `None` when
    /// the level has no reference data.
    fn distributions(
        &self,
        level: CompetitionLevel,
    ) -> Result<Option<ReferenceDistribution>, ReferenceError>;
}
