// Contact-point projector: maps 3-D bat-ball contact coordinates onto the
// two fixed report views and aggregates contact consistency statistics.
//
// Axis convention: Y is height off the ground, Z is depth relative to the
// plate front (negative = deeper). Both views consume inches; events carry
// feet.

use serde::{Deserialize, Serialize};

use crate::event::BattedBallEvent;
use crate::metrics::classify::{BallFlight, CONTACT_VIEW};
use crate::metrics::summary::HARD_HIT_MPH;

// ---------------------------------------------------------------------------
// Plot constants (fixed by the report's visual target)
// ---------------------------------------------------------------------------

/// Side view: depth axis anchor and scale. Depth d (inches) maps to plot
/// x = 15 + (25 - d) / 42 * 350, putting the zone front (d = 0) at x = 223
/// and the zone back (d = -17) at x = 365.
const SIDE_X_ORIGIN: f64 = 15.0;
const SIDE_X_DEPTH_OFFSET: f64 = 25.0;
const SIDE_X_DEPTH_RANGE: f64 = 42.0;
const SIDE_X_SCALE: f64 = 350.0;

/// Side view: height band. Observed heights (±3 in padding) map linearly
/// into the 150-unit band between plot y = 275 (bottom) and y = 125 (top),
/// clamped a little beyond it.
const SIDE_Y_BOTTOM: f64 = 275.0;
const SIDE_Y_BAND: f64 = 150.0;
const SIDE_Y_CLAMP_MIN: f64 = 110.0;
const SIDE_Y_CLAMP_MAX: f64 = 285.0;
const SIDE_Y_PADDING_IN: f64 = 3.0;

/// Strike-zone depth extent, inches. Contact between the plate front and
/// this depth counts as in-zone.
const ZONE_DEPTH_MIN_IN: f64 = -17.0;

/// Overhead view: ±18 in lateral / 34 in depth window mapped into the
/// 10%-90% band of the plot, clamped to [5%, 95%].
const OVERHEAD_LATERAL_HALF_IN: f64 = 18.0;
const OVERHEAD_DEPTH_OFFSET_IN: f64 = 17.0;
const OVERHEAD_DEPTH_RANGE_IN: f64 = 34.0;
const PLOT_PERCENT_MIN: f64 = 5.0;
const PLOT_PERCENT_MAX: f64 = 95.0;

const FEET_TO_INCHES: f64 = 12.0;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Marker style for a side-view point. Squares flag hard-hit contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    Square,
    Circle,
}

/// One plotted contact in the side view. The depth coordinate is
/// deliberately unclamped so contact outside the zone stays visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideViewPoint {
    pub x: f64,
    pub y: f64,
    pub marker: MarkerShape,
    pub flight: BallFlight,
    pub in_zone: bool,
    pub tooltip: String,
}

/// One plotted contact in the overhead view, in percent coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverheadPoint {
    pub x_percent: f64,
    pub y_percent: f64,
    pub flight: BallFlight,
    /// 1-based index label shown on the marker.
    pub label: usize,
    pub tooltip: String,
}

/// Primary contact zone, classified by average depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactZone {
    Deep,
    Optimal,
    Early,
}

impl ContactZone {
    pub fn label(&self) -> &'static str {
        match self {
            ContactZone::Deep => "Deep",
            ContactZone::Optimal => "Optimal",
            ContactZone::Early => "Early",
        }
    }
}

/// Depth-consistency grade from the sample standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsistencyGrade {
    Excellent,
    Good,
    NeedsWork,
    /// Fewer than two contacts; the deviation is undefined.
    NotAvailable,
}

impl ConsistencyGrade {
    pub fn label(&self) -> &'static str {
        match self {
            ConsistencyGrade::Excellent => "Excellent",
            ConsistencyGrade::Good => "Good",
            ConsistencyGrade::NeedsWork => "Needs Work",
            ConsistencyGrade::NotAvailable => "N/A",
        }
    }
}

/// Aggregate contact statistics, in inches rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactStatistics {
    pub avg_side: f64,
    pub avg_depth: f64,
    pub avg_height: f64,
    pub total_contacts: usize,
    pub primary_zone: ContactZone,
    pub consistency: ConsistencyGrade,
}

impl ContactStatistics {
    /// Inch-suffixed display strings for (side, depth, height).
    pub fn display_averages(&self) -> (String, String, String) {
        (
            format_inches(self.avg_side),
            format_inches(self.avg_depth),
            format_inches(self.avg_height),
        )
    }
}

fn format_inches(v: f64) -> String {
    format!("{:.1}\"", v)
}

/// Both contact views plus aggregate statistics for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactReport {
    pub side_view: Vec<SideViewPoint>,
    pub overhead_view: Vec<OverheadPoint>,
    /// `None` when no event had a full contact position.
    pub stats: Option<ContactStatistics>,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{}", v),
        None => "N/A".to_string(),
    }
}

/// Project a session's contact positions into both views.
///
/// Events without all three contact axes are skipped; a session with none
/// yields empty views and no statistics.
pub fn project_contact(events: &[BattedBallEvent]) -> ContactReport {
    let contacts: Vec<(&BattedBallEvent, crate::event::ContactPosition)> = events
        .iter()
        .filter_map(|e| e.contact_position().map(|p| (e, p)))
        .collect();

    if contacts.is_empty() {
        return ContactReport {
            side_view: Vec::new(),
            overhead_view: Vec::new(),
            stats: None,
        };
    }

    let heights_in: Vec<f64> = contacts
        .iter()
        .map(|(_, p)| p.y * FEET_TO_INCHES)
        .collect();
    let depths_in: Vec<f64> = contacts
        .iter()
        .map(|(_, p)| p.z * FEET_TO_INCHES)
        .collect();
    let sides_in: Vec<f64> = contacts
        .iter()
        .map(|(_, p)| p.x * FEET_TO_INCHES)
        .collect();

    // Observed height range with fixed padding frames the side-view band.
    let y_min = heights_in.iter().copied().fold(f64::MAX, f64::min) - SIDE_Y_PADDING_IN;
    let y_max = heights_in.iter().copied().fold(f64::MIN, f64::max) + SIDE_Y_PADDING_IN;
    let y_range = y_max - y_min;

    let mut side_view = Vec::with_capacity(contacts.len());
    let mut overhead_view = Vec::with_capacity(contacts.len());

    for (i, (event, pos)) in contacts.iter().enumerate() {
        let height_in = pos.y * FEET_TO_INCHES;
        let depth_in = pos.z * FEET_TO_INCHES;
        let side_in = pos.x * FEET_TO_INCHES;

        // Side view: depth along x (unclamped), height into the band.
        let x = SIDE_X_ORIGIN + (SIDE_X_DEPTH_OFFSET - depth_in) / SIDE_X_DEPTH_RANGE * SIDE_X_SCALE;
        let y = if y_range > 0.0 {
            let normalized = (height_in - y_min) / y_range;
            SIDE_Y_BOTTOM - normalized * SIDE_Y_BAND
        } else {
            SIDE_Y_BOTTOM - SIDE_Y_BAND / 2.0
        };
        let y = y.clamp(SIDE_Y_CLAMP_MIN, SIDE_Y_CLAMP_MAX);

        let in_zone = (ZONE_DEPTH_MIN_IN..=0.0).contains(&depth_in);
        let exit_speed = event.exit_speed.unwrap_or(0.0);
        let marker = if exit_speed >= HARD_HIT_MPH {
            MarkerShape::Square
        } else {
            MarkerShape::Circle
        };
        let flight = CONTACT_VIEW.classify(event.launch_angle, event.exit_speed);

        let zone_status = if in_zone { "IN ZONE" } else { "OUT OF ZONE" };
        let tooltip = format!(
            "Contact {}: Z={:.1}in (depth), Y={:.1}in (height) | {} | EV: {} mph | LA: {}\u{b0} | Dist: {} ft",
            i + 1,
            depth_in,
            height_in,
            zone_status,
            exit_speed,
            fmt_opt(event.launch_angle),
            fmt_opt(event.distance),
        );

        side_view.push(SideViewPoint {
            x,
            y,
            marker,
            flight,
            in_zone,
            tooltip,
        });

        // Overhead view: lateral and depth in percent coordinates.
        let x_percent = ((side_in + OVERHEAD_LATERAL_HALF_IN) / (2.0 * OVERHEAD_LATERAL_HALF_IN))
            * 80.0
            + 10.0;
        let y_percent =
            ((depth_in + OVERHEAD_DEPTH_OFFSET_IN) / OVERHEAD_DEPTH_RANGE_IN) * 80.0 + 10.0;

        overhead_view.push(OverheadPoint {
            x_percent: x_percent.clamp(PLOT_PERCENT_MIN, PLOT_PERCENT_MAX),
            y_percent: y_percent.clamp(PLOT_PERCENT_MIN, PLOT_PERCENT_MAX),
            flight,
            label: i + 1,
            tooltip: format!(
                "Point {}: X={:.1}\" (side), Z={:.1}\" (depth), Y={:.1}\" (height)",
                i + 1,
                side_in,
                depth_in,
                height_in,
            ),
        });
    }

    ContactReport {
        side_view,
        overhead_view,
        stats: Some(contact_statistics(&sides_in, &depths_in, &heights_in)),
    }
}

fn contact_statistics(sides: &[f64], depths: &[f64], heights: &[f64]) -> ContactStatistics {
    let n = depths.len() as f64;
    let avg_side = round2(sides.iter().sum::<f64>() / n);
    let avg_depth = round2(depths.iter().sum::<f64>() / n);
    let avg_height = round2(heights.iter().sum::<f64>() / n);

    let primary_zone = if avg_depth > 3.0 {
        ContactZone::Deep
    } else if avg_depth > -3.0 {
        ContactZone::Optimal
    } else {
        ContactZone::Early
    };

    let consistency = match sample_stdev(depths) {
        Some(score) if score < 2.0 => ConsistencyGrade::Excellent,
        Some(score) if score < 4.0 => ConsistencyGrade::Good,
        Some(_) => ConsistencyGrade::NeedsWork,
        None => ConsistencyGrade::NotAvailable,
    };

    ContactStatistics {
        avg_side,
        avg_depth,
        avg_height,
        total_contacts: depths.len(),
        primary_zone,
        consistency,
    }
}

/// Sample standard deviation (N-1 denominator); `None` below two samples.
fn sample_stdev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
