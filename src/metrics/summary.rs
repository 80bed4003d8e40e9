// Summary statistics engine: per-session rate and velocity metrics for one
// hitter, with an optional reference-level benchmark attached.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::event::{BattedBallEvent, CompetitionLevel};
use crate::metrics::comparison::{mean_difference, MeanComparison};
use crate::reference::ReferenceSource;

/// Hard-hit threshold, mph. Fixed by definition, not configurable.
pub const HARD_HIT_MPH: f64 = 95.0;

/// Inclusive launch-angle band for barrels, degrees.
pub const BARREL_ANGLE_MIN: f64 = 8.0;
pub const BARREL_ANGLE_MAX: f64 = 32.0;

/// Round to one decimal place for display. Comparisons downstream consume
/// these rounded values.
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Player metrics
// ---------------------------------------------------------------------------

/// The five core hitting metrics for one session, display-rounded to one
/// decimal. Zero-valued when the session had no batted balls with exit
/// velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    pub avg_exit_velo: f64,
    pub percentile_90_ev: f64,
    pub max_exit_velo: f64,
    pub barrel_rate: f64,
    pub hardhit_rate: f64,
    /// Count of batted balls with a usable exit-speed reading.
    pub batted_balls: usize,
}

impl PlayerMetrics {
    fn zero() -> Self {
        PlayerMetrics {
            avg_exit_velo: 0.0,
            percentile_90_ev: 0.0,
            max_exit_velo: 0.0,
            barrel_rate: 0.0,
            hardhit_rate: 0.0,
            batted_balls: 0,
        }
    }
}

/// Compute the core metrics over a session's events.
///
/// Only events with a non-null, non-zero exit speed count. The 90th
/// percentile is nearest-rank with a truncated index: the value at
/// `floor(0.9 * N)` of the ascending sort, not an interpolated quantile.
pub fn compute_player_metrics(events: &[BattedBallEvent]) -> PlayerMetrics {
    let batted: Vec<&BattedBallEvent> = events
        .iter()
        .filter(|e| e.batted_ball_ev().is_some())
        .collect();
    if batted.is_empty() {
        return PlayerMetrics::zero();
    }

    let mut exit_speeds: Vec<f64> = batted.iter().filter_map(|e| e.batted_ball_ev()).collect();
    let n = exit_speeds.len();
    let avg = exit_speeds.iter().sum::<f64>() / n as f64;
    let max = exit_speeds.iter().copied().fold(f64::MIN, f64::max);

    exit_speeds.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let p90_index = (0.9 * n as f64) as usize;
    let p90 = exit_speeds[p90_index];

    let mut hard_hits = 0usize;
    let mut barrels = 0usize;
    for event in &batted {
        let Some(ev) = event.batted_ball_ev() else {
            continue;
        };
        if ev >= HARD_HIT_MPH {
            hard_hits += 1;
            if event
                .launch_angle
                .is_some_and(|a| (BARREL_ANGLE_MIN..=BARREL_ANGLE_MAX).contains(&a))
            {
                barrels += 1;
            }
        }
    }

    PlayerMetrics {
        avg_exit_velo: round1(avg),
        percentile_90_ev: round1(p90),
        max_exit_velo: round1(max),
        barrel_rate: round1(barrels as f64 / n as f64 * 100.0),
        hardhit_rate: round1(hard_hits as f64 / n as f64 * 100.0),
        batted_balls: n,
    }
}

// ---------------------------------------------------------------------------
// Summary with reference benchmark
// ---------------------------------------------------------------------------

/// One metric's reference point and verdict against the comparison level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBenchmark {
    /// Population mean at the comparison level, display-rounded. `None` when
    /// the reference aggregate had no value for this metric.
    pub reference_avg: Option<f64>,
    pub comparison: Option<MeanComparison>,
}

/// Per-metric benchmarks against one competition level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBenchmark {
    pub avg_exit_velo: MetricBenchmark,
    pub percentile_90_ev: MetricBenchmark,
    pub max_exit_velo: MetricBenchmark,
    pub barrel_rate: MetricBenchmark,
    pub hardhit_rate: MetricBenchmark,
}

/// Summary statistics handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    #[serde(flatten)]
    pub metrics: PlayerMetrics,
    /// The level the benchmark was computed against, when one was requested.
    pub comparison_level: Option<CompetitionLevel>,
    /// Absent when no level was requested, the session had no batted balls,
    /// or the reference lookup returned nothing.
    pub benchmark: Option<LevelBenchmark>,
}

/// Summarize a session with no reference comparison.
pub fn summarize(events: &[BattedBallEvent]) -> SummaryStatistics {
    SummaryStatistics {
        metrics: compute_player_metrics(events),
        comparison_level: None,
        benchmark: None,
    }
}

/// Summarize a session and benchmark it against one competition level.
///
/// A failed or empty reference lookup degrades to a summary without a
/// benchmark; it is never an error.
pub fn summarize_with_reference(
    events: &[BattedBallEvent],
    level: CompetitionLevel,
    source: &dyn ReferenceSource,
) -> SummaryStatistics {
    let metrics = compute_player_metrics(events);
    if metrics.batted_balls == 0 {
        return SummaryStatistics {
            metrics,
            comparison_level: None,
            benchmark: None,
        };
    }

    let averages = match source.averages(level) {
        Ok(avg) => avg,
        Err(e) => {
            warn!("reference averages unavailable for {}: {}", level, e);
            None
        }
    };

    let benchmark = averages.map(|avg| {
        debug!(
            "benchmarking against {} ({} batted balls)",
            level, avg.total_batted_balls
        );
        LevelBenchmark {
            avg_exit_velo: benchmark_metric(metrics.avg_exit_velo, avg.avg_exit_velo),
            percentile_90_ev: benchmark_metric(metrics.percentile_90_ev, avg.percentile_90_exit_velo),
            max_exit_velo: benchmark_metric(metrics.max_exit_velo, avg.max_exit_velo),
            barrel_rate: benchmark_metric(metrics.barrel_rate, avg.barrel_rate),
            hardhit_rate: benchmark_metric(metrics.hardhit_rate, avg.hardhit_rate),
        }
    });

    SummaryStatistics {
        metrics,
        comparison_level: Some(level),
        benchmark,
    }
}

fn benchmark_metric(player_value: f64, reference_mean: Option<f64>) -> MetricBenchmark {
    MetricBenchmark {
        reference_avg: reference_mean.map(round1),
        comparison: reference_mean.map(|m| mean_difference(player_value, m)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
