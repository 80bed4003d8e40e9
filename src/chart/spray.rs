// Spray-position projector: maps (direction, distance) batted-ball data to
// field-relative plot coordinates and aggregates spray tendencies.

use serde::{Deserialize, Serialize};

use crate::event::BattedBallEvent;
use crate::metrics::classify::{BallFlight, SPRAY_VIEW};

// ---------------------------------------------------------------------------
// Plot constants
// ---------------------------------------------------------------------------

/// Home plate anchor on the plot, percent coordinates.
const HOME_PLATE_X: f64 = 50.0;
const HOME_PLATE_Y: f64 = 85.0;

/// Field foul-line extent, degrees. Directions beyond are clipped, not
/// rejected.
const FOUL_LINE_DEG: f64 = 45.0;

const PLOT_PERCENT_MIN: f64 = 5.0;
const PLOT_PERCENT_MAX: f64 = 95.0;

/// Pull/opposite direction threshold, degrees.
const DIRECTION_THRESHOLD_DEG: f64 = 5.0;

/// Long-hit distance threshold, feet.
const LONG_HIT_FT: f64 = 300.0;

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Map carry distance (feet) to a plot radius percent.
///
/// Five piecewise-linear bands compress realistic distances into most of
/// the plot while extreme values saturate: 100 ft lands at 15%, 200 at
/// 30%, 300 at 45%, 400 at 60%, and anything past 500 caps at 70%.
fn radius_percent(distance: f64) -> f64 {
    if distance <= 100.0 {
        (distance / 100.0) * 15.0
    } else if distance <= 200.0 {
        15.0 + ((distance - 100.0) / 100.0) * 15.0
    } else if distance <= 300.0 {
        30.0 + ((distance - 200.0) / 100.0) * 15.0
    } else if distance <= 400.0 {
        45.0 + ((distance - 300.0) / 100.0) * 15.0
    } else {
        60.0 + ((distance - 400.0) / 100.0).min(1.0) * 10.0
    }
}

/// Project one batted ball onto the spray plot.
///
/// Direction is clamped to the foul lines, the distance runs through the
/// piecewise radius mapping, and the offset is applied from the home-plate
/// anchor (depth decreases plot y). Both outputs are clamped to [5, 95].
pub fn spray_position(direction_degrees: f64, distance_feet: f64) -> (f64, f64) {
    let field_direction = direction_degrees.clamp(-FOUL_LINE_DEG, FOUL_LINE_DEG);
    let angle_rad = field_direction.to_radians();
    let radius = radius_percent(distance_feet);

    let x = HOME_PLATE_X + angle_rad.sin() * radius;
    let y = HOME_PLATE_Y - angle_rad.cos() * radius;

    (
        x.clamp(PLOT_PERCENT_MIN, PLOT_PERCENT_MAX),
        y.clamp(PLOT_PERCENT_MIN, PLOT_PERCENT_MAX),
    )
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One plotted ball on the spray chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprayPoint {
    pub x_percent: f64,
    pub y_percent: f64,
    pub flight: BallFlight,
    pub tooltip: String,
}

/// Aggregate spray tendencies. Percentages and the average distance are
/// rounded to whole numbers (unlike the contact statistics, which keep one
/// decimal; a deliberate report-format difference).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprayStatistics {
    pub total_spray_balls: usize,
    pub pull_percentage: u32,
    pub opposite_percentage: u32,
    pub center_percentage: u32,
    pub ground_balls: usize,
    pub line_drives: usize,
    pub fly_balls: usize,
    pub avg_distance: u32,
    pub max_distance: f64,
    /// Hits carrying 300 ft or more.
    pub long_hits: usize,
}

/// Spray chart points plus aggregate statistics for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprayReport {
    pub points: Vec<SprayPoint>,
    /// `None` when no event qualified for the aggregate.
    pub stats: Option<SprayStatistics>,
}

// ---------------------------------------------------------------------------
// Report projection
// ---------------------------------------------------------------------------

/// Build the spray chart for a session.
///
/// Points need direction and a positive distance; the launch angle is
/// optional for plotting (missing angles tag as foul) but required for the
/// aggregate statistics.
pub fn project_spray(events: &[BattedBallEvent]) -> SprayReport {
    let mut points = Vec::new();

    for (i, event) in events.iter().enumerate() {
        let (Some(direction), Some(distance)) = (event.direction, event.distance) else {
            continue;
        };
        if distance <= 0.0 {
            continue;
        }
        let (x_percent, y_percent) = spray_position(direction, distance);
        let flight = SPRAY_VIEW.classify(event.launch_angle, event.exit_speed);
        points.push(SprayPoint {
            x_percent,
            y_percent,
            flight,
            tooltip: format!(
                "Ball {}: {}ft, {}\u{b0}, {}\u{b0} LA",
                i + 1,
                distance,
                direction,
                event
                    .launch_angle
                    .map(|a| format!("{}", a))
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
        });
    }

    SprayReport {
        stats: spray_statistics(events),
        points,
    }
}

fn spray_statistics(events: &[BattedBallEvent]) -> Option<SprayStatistics> {
    // The aggregate requires direction, distance and angle all measured.
    let qualifying: Vec<(&BattedBallEvent, f64, f64, f64)> = events
        .iter()
        .filter_map(|e| match (e.direction, e.distance, e.launch_angle) {
            (Some(dir), Some(dist), Some(angle)) if dist > 0.0 => Some((e, dir, dist, angle)),
            _ => None,
        })
        .collect();

    if qualifying.is_empty() {
        return None;
    }

    let total = qualifying.len();
    let pull = qualifying
        .iter()
        .filter(|(_, dir, _, _)| *dir < -DIRECTION_THRESHOLD_DEG)
        .count();
    let opposite = qualifying
        .iter()
        .filter(|(_, dir, _, _)| *dir > DIRECTION_THRESHOLD_DEG)
        .count();
    let center = total - pull - opposite;

    let mut ground_balls = 0usize;
    let mut line_drives = 0usize;
    let mut fly_balls = 0usize;
    for (event, _, _, _) in &qualifying {
        match SPRAY_VIEW.classify(event.launch_angle, event.exit_speed) {
            BallFlight::GroundBall => ground_balls += 1,
            BallFlight::LineDrive => line_drives += 1,
            BallFlight::FlyBall => fly_balls += 1,
            _ => {}
        }
    }

    let distances: Vec<f64> = qualifying.iter().map(|(_, _, dist, _)| *dist).collect();
    let avg_distance = distances.iter().sum::<f64>() / total as f64;
    let max_distance = distances.iter().copied().fold(f64::MIN, f64::max);
    let long_hits = distances.iter().filter(|d| **d >= LONG_HIT_FT).count();

    let pct = |count: usize| (count as f64 / total as f64 * 100.0).round() as u32;

    Some(SprayStatistics {
        total_spray_balls: total,
        pull_percentage: pct(pull),
        opposite_percentage: pct(opposite),
        center_percentage: pct(center),
        ground_balls,
        line_drives,
        fly_balls,
        avg_distance: avg_distance.round() as u32,
        max_distance,
        long_hits,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
