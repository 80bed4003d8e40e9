// Population comparator: percentile ranking against reference distributions
// and the multi-level D1/D2/D3 sweep.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::event::{BattedBallEvent, CompetitionLevel};
use crate::metrics::summary::{compute_player_metrics, round1, PlayerMetrics};
use crate::reference::{ReferenceAverages, ReferenceDistribution, ReferenceSource};

/// Tiers covered by the multi-level sweep. SEC is an assignable player
/// level but not a sweep tier.
pub const SWEEP_LEVELS: [CompetitionLevel; 3] = [
    CompetitionLevel::D1,
    CompetitionLevel::D2,
    CompetitionLevel::D3,
];

// ---------------------------------------------------------------------------
// Percentile rank
// ---------------------------------------------------------------------------

/// Where a player value falls within a reference population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Percentile in [1, 99]. Never a literal 0th or 100th percentile, so
    /// the report makes no absolute claims at the distribution edges.
    pub percentile: f64,
    /// True iff the player ranks in the upper half.
    pub better: bool,
    /// Number of reference batters the ranking was computed against.
    pub population_size: usize,
}

/// Rank a player value against a reference population.
///
/// The percentile is the share of population members strictly below the
/// player value, rounded to one decimal and clamped into [1, 99].
/// Returns `None` for an empty population.
pub fn percentile_rank(player_value: f64, population: &[f64]) -> Option<ComparisonResult> {
    if population.is_empty() {
        return None;
    }
    let below = population.iter().filter(|v| **v < player_value).count();
    let raw = round1(below as f64 / population.len() as f64 * 100.0);
    // The report never makes absolute claims at the distribution edges.
    let percentile = raw.clamp(1.0, 99.0);
    Some(ComparisonResult {
        percentile,
        better: percentile >= 50.0,
        population_size: population.len(),
    })
}

// ---------------------------------------------------------------------------
// Mean difference
// ---------------------------------------------------------------------------

/// Verdict from the simpler, non-percentile comparison path. Every hitting
/// metric is higher-is-better, so the sign alone decides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanComparison {
    pub difference: f64,
    pub better: bool,
    pub absolute_diff: f64,
}

/// Compare a player value against a population mean.
pub fn mean_difference(player_value: f64, population_mean: f64) -> MeanComparison {
    let difference = player_value - population_mean;
    MeanComparison {
        difference,
        better: difference > 0.0,
        absolute_diff: difference.abs(),
    }
}

// ---------------------------------------------------------------------------
// Multi-level sweep
// ---------------------------------------------------------------------------

/// One metric's comparison against one tier, formatted for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    /// Tier population mean, one decimal, or "N/A" when unavailable.
    pub reference_avg: String,
    pub comparison: Option<ComparisonResult>,
    /// Whole-number percentile string ("62%"), or "N/A".
    pub percentile_label: String,
}

impl MetricComparison {
    fn unavailable() -> Self {
        MetricComparison {
            reference_avg: "N/A".to_string(),
            comparison: None,
            percentile_label: "N/A".to_string(),
        }
    }
}

/// All five metric comparisons against one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelComparisonSet {
    pub avg_exit_velo: MetricComparison,
    pub percentile_90_ev: MetricComparison,
    pub max_exit_velo: MetricComparison,
    pub barrel_rate: MetricComparison,
    pub hardhit_rate: MetricComparison,
}

/// The full tier-by-metric comparison table for one hitter's session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLevelComparison {
    pub player: PlayerMetrics,
    /// The hitter's own assigned comparison level.
    pub comparison_level: CompetitionLevel,
    pub levels: BTreeMap<CompetitionLevel, LevelComparisonSet>,
}

/// Run the multi-level sweep: one independent reference fetch per tier,
/// percentile rank per metric. Returns `None` when the session had no
/// batted balls with exit velocity.
///
/// Tiers whose reference lookups fail or come back empty still appear in
/// the output with "N/A" entries, so the rendered table keeps its shape.
pub fn multi_level_comparisons(
    events: &[BattedBallEvent],
    assigned_level: CompetitionLevel,
    source: &dyn ReferenceSource,
) -> Option<MultiLevelComparison> {
    let player = compute_player_metrics(events);
    if player.batted_balls == 0 {
        return None;
    }

    let mut levels = BTreeMap::new();
    for level in SWEEP_LEVELS {
        let distribution = fetch_distribution(source, level);
        let averages = fetch_averages(source, level);
        debug!(
            "sweep level {}: distribution={} averages={}",
            level,
            distribution.is_some(),
            averages.is_some()
        );
        levels.insert(
            level,
            LevelComparisonSet {
                avg_exit_velo: compare_metric(
                    player.avg_exit_velo,
                    distribution.as_ref().map(|d| d.avg_exit_velo.as_slice()),
                    averages.as_ref().and_then(|a| a.avg_exit_velo),
                ),
                percentile_90_ev: compare_metric(
                    player.percentile_90_ev,
                    distribution
                        .as_ref()
                        .map(|d| d.percentile_90_exit_velo.as_slice()),
                    averages.as_ref().and_then(|a| a.percentile_90_exit_velo),
                ),
                max_exit_velo: compare_metric(
                    player.max_exit_velo,
                    distribution.as_ref().map(|d| d.max_exit_velo.as_slice()),
                    averages.as_ref().and_then(|a| a.max_exit_velo),
                ),
                barrel_rate: compare_metric(
                    player.barrel_rate,
                    distribution.as_ref().map(|d| d.barrel_rate.as_slice()),
                    averages.as_ref().and_then(|a| a.barrel_rate),
                ),
                hardhit_rate: compare_metric(
                    player.hardhit_rate,
                    distribution.as_ref().map(|d| d.hardhit_rate.as_slice()),
                    averages.as_ref().and_then(|a| a.hardhit_rate),
                ),
            },
        );
    }

    Some(MultiLevelComparison {
        player,
        comparison_level: assigned_level,
        levels,
    })
}

fn fetch_distribution(
    source: &dyn ReferenceSource,
    level: CompetitionLevel,
) -> Option<ReferenceDistribution> {
    match source.distributions(level) {
        Ok(Some(d)) if !d.is_empty() => Some(d),
        Ok(_) => None,
        Err(e) => {
            warn!("reference distribution unavailable for {}: {}", level, e);
            None
        }
    }
}

fn fetch_averages(
    source: &dyn ReferenceSource,
    level: CompetitionLevel,
) -> Option<ReferenceAverages> {
    match source.averages(level) {
        Ok(a) => a,
        Err(e) => {
            warn!("reference averages unavailable for {}: {}", level, e);
            None
        }
    }
}

fn compare_metric(
    player_value: f64,
    population: Option<&[f64]>,
    reference_avg: Option<f64>,
) -> MetricComparison {
    let comparison = population.and_then(|pop| percentile_rank(player_value, pop));
    match (comparison, reference_avg) {
        (None, None) => MetricComparison::unavailable(),
        _ => MetricComparison {
            reference_avg: reference_avg
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "N/A".to_string()),
            comparison,
            percentile_label: comparison
                .map(|c| format!("{:.0}%", c.percentile))
                .unwrap_or_else(|| "N/A".to_string()),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceError;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    // ---- percentile_rank ----

    #[test]
    fn percentile_rank_worked_example() {
        // 3 of 5 below 92 -> 60.0, upper half.
        let pop = vec![80.0, 85.0, 90.0, 95.0, 100.0];
        let r = percentile_rank(92.0, &pop).unwrap();
        assert!(approx_eq(r.percentile, 60.0, 1e-10));
        assert!(r.better);
        assert_eq!(r.population_size, 5);
    }

    #[test]
    fn percentile_rank_empty_population() {
        assert!(percentile_rank(92.0, &[]).is_none());
    }

    #[test]
    fn percentile_rank_clamps_to_1_and_99() {
        let pop = vec![80.0, 85.0, 90.0];
        // Below the minimum: 0 below -> clamped up to 1.
        let r = percentile_rank(70.0, &pop).unwrap();
        assert!(approx_eq(r.percentile, 1.0, 1e-10));
        assert!(!r.better);
        // Above the maximum: all below -> clamped down to 99.
        let r = percentile_rank(110.0, &pop).unwrap();
        assert!(approx_eq(r.percentile, 99.0, 1e-10));
        assert!(r.better);
    }

    #[test]
    fn percentile_rank_ties_do_not_count_as_below() {
        // Strictly-less count: a value equal to a member ranks below it.
        let pop = vec![90.0, 90.0, 95.0, 100.0];
        let r = percentile_rank(90.0, &pop).unwrap();
        assert!(approx_eq(r.percentile, 1.0, 1e-10)); // 0 below -> clamp
    }

    #[test]
    fn percentile_rank_is_monotonic() {
        let pop: Vec<f64> = (0..50).map(|i| 70.0 + i as f64).collect();
        let mut last = 0.0;
        for v in [60.0, 72.5, 85.0, 99.9, 130.0] {
            let r = percentile_rank(v, &pop).unwrap();
            assert!(r.percentile >= last, "rank not monotonic at {}", v);
            assert!((1.0..=99.0).contains(&r.percentile));
            last = r.percentile;
        }
    }

    #[test]
    fn percentile_rank_better_threshold_at_50() {
        let pop: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let r = percentile_rank(5.0, &pop).unwrap();
        assert!(approx_eq(r.percentile, 50.0, 1e-10));
        assert!(r.better);
        let r = percentile_rank(4.5, &pop).unwrap();
        assert!(!r.better);
    }

    // ---- mean_difference ----

    #[test]
    fn mean_difference_sign_decides() {
        let c = mean_difference(92.0, 88.5);
        assert!(approx_eq(c.difference, 3.5, 1e-10));
        assert!(c.better);
        assert!(approx_eq(c.absolute_diff, 3.5, 1e-10));

        let c = mean_difference(85.0, 88.5);
        assert!(!c.better);
        assert!(approx_eq(c.absolute_diff, 3.5, 1e-10));

        // Exactly equal is not better.
        assert!(!mean_difference(88.5, 88.5).better);
    }

    // ---- multi-level sweep ----

    struct FixtureSource {
        fail_levels: Vec<CompetitionLevel>,
    }

    impl ReferenceSource for FixtureSource {
        fn averages(
            &self,
            level: CompetitionLevel,
        ) -> Result<Option<ReferenceAverages>, ReferenceError> {
            if self.fail_levels.contains(&level) {
                return Err(ReferenceError::Query {
                    level,
                    message: "warehouse timeout".into(),
                });
            }
            Ok(Some(ReferenceAverages {
                avg_exit_velo: Some(87.25),
                percentile_90_exit_velo: Some(98.4),
                max_exit_velo: Some(103.1),
                barrel_rate: Some(6.8),
                hardhit_rate: Some(28.0),
                total_batted_balls: 12_000,
                total_batters: Some(400),
            }))
        }

        fn distributions(
            &self,
            level: CompetitionLevel,
        ) -> Result<Option<ReferenceDistribution>, ReferenceError> {
            if self.fail_levels.contains(&level) {
                return Err(ReferenceError::Query {
                    level,
                    message: "warehouse timeout".into(),
                });
            }
            Ok(Some(ReferenceDistribution {
                avg_exit_velo: vec![80.0, 85.0, 90.0, 95.0, 100.0],
                percentile_90_exit_velo: vec![90.0, 95.0, 100.0],
                max_exit_velo: vec![95.0, 100.0, 105.0],
                barrel_rate: vec![2.0, 5.0, 9.0],
                hardhit_rate: vec![20.0, 30.0, 40.0],
            }))
        }
    }

    fn session() -> Vec<BattedBallEvent> {
        vec![
            BattedBallEvent {
                pitch_no: 1,
                exit_speed: Some(100.0),
                launch_angle: Some(20.0),
                distance: Some(340.0),
                direction: Some(-10.0),
                play_result: None,
                contact_x: None,
                contact_y: None,
                contact_z: None,
            },
            BattedBallEvent {
                pitch_no: 2,
                exit_speed: Some(90.0),
                launch_angle: Some(5.0),
                distance: Some(150.0),
                direction: Some(12.0),
                play_result: None,
                contact_x: None,
                contact_y: None,
                contact_z: None,
            },
            BattedBallEvent {
                pitch_no: 3,
                exit_speed: Some(96.0),
                launch_angle: Some(15.0),
                distance: Some(280.0),
                direction: Some(2.0),
                play_result: None,
                contact_x: None,
                contact_y: None,
                contact_z: None,
            },
        ]
    }

    #[test]
    fn sweep_covers_all_tiers() {
        let source = FixtureSource { fail_levels: vec![] };
        let sweep =
            multi_level_comparisons(&session(), CompetitionLevel::D2, &source).unwrap();

        assert_eq!(sweep.comparison_level, CompetitionLevel::D2);
        assert_eq!(sweep.levels.len(), SWEEP_LEVELS.len());
        for level in SWEEP_LEVELS {
            let set = &sweep.levels[&level];
            // Player avg EV 95.3 ranks above 4 of 5 members -> 80.0.
            let c = set.avg_exit_velo.comparison.unwrap();
            assert!(approx_eq(c.percentile, 80.0, 1e-10));
            assert!(c.better);
            assert_eq!(set.avg_exit_velo.reference_avg, "87.3");
            assert_eq!(set.avg_exit_velo.percentile_label, "80%");
        }
    }

    #[test]
    fn sweep_degrades_failed_tier_to_na() {
        let source = FixtureSource {
            fail_levels: vec![CompetitionLevel::D3],
        };
        let sweep =
            multi_level_comparisons(&session(), CompetitionLevel::D1, &source).unwrap();

        let d3 = &sweep.levels[&CompetitionLevel::D3];
        assert_eq!(d3.avg_exit_velo.reference_avg, "N/A");
        assert_eq!(d3.avg_exit_velo.percentile_label, "N/A");
        assert!(d3.avg_exit_velo.comparison.is_none());

        // Other tiers are unaffected.
        let d1 = &sweep.levels[&CompetitionLevel::D1];
        assert!(d1.avg_exit_velo.comparison.is_some());
    }

    #[test]
    fn sweep_requires_batted_balls() {
        let source = FixtureSource { fail_levels: vec![] };
        let no_ev = vec![BattedBallEvent {
            pitch_no: 1,
            exit_speed: None,
            launch_angle: None,
            distance: None,
            direction: None,
            play_result: None,
            contact_x: None,
            contact_y: None,
            contact_z: None,
        }];
        assert!(multi_level_comparisons(&no_ev, CompetitionLevel::D1, &source).is_none());
    }

    #[test]
    fn sweep_player_metrics_are_display_rounded() {
        let source = FixtureSource { fail_levels: vec![] };
        let sweep =
            multi_level_comparisons(&session(), CompetitionLevel::D1, &source).unwrap();
        assert!(approx_eq(sweep.player.avg_exit_velo, 95.3, 1e-10));
        assert!(approx_eq(sweep.player.hardhit_rate, 66.7, 1e-10));
    }
}
