// Batted-ball event model and warehouse CSV ingestion.
//
// Reads warehouse-export CSV files (TrackMan-style column names: PitchNo,
// ExitSpeed, Angle, Distance, Direction, ContactPositionX/Y/Z, PlayResult).
// Extra columns are silently ignored via `#[serde(flatten)]`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Competition level
// ---------------------------------------------------------------------------

/// A named reference population tier used as a comparison baseline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CompetitionLevel {
    D1,
    D2,
    D3,
    #[serde(rename = "SEC")]
    Sec,
}

impl CompetitionLevel {
    /// The warehouse filter string for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionLevel::D1 => "D1",
            CompetitionLevel::D2 => "D2",
            CompetitionLevel::D3 => "D3",
            CompetitionLevel::Sec => "SEC",
        }
    }

    /// Resolve a warehouse label to a level. Unknown or empty labels fall
    /// back to D1, matching the roster table's default assignment.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "D1" => CompetitionLevel::D1,
            "D2" => CompetitionLevel::D2,
            "D3" => CompetitionLevel::D3,
            "SEC" => CompetitionLevel::Sec,
            _ => CompetitionLevel::D1,
        }
    }
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Event model
// ---------------------------------------------------------------------------

/// Bat-ball contact coordinates in feet. X is lateral offset from plate
/// center, Y is height off the ground, Z is depth relative to the front of
/// the plate (negative = deeper into the zone).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One pitch/swing record from the warehouse. All measurements are optional;
/// a record with no exit speed is excluded from every rate/velocity
/// statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattedBallEvent {
    /// Pitch sequence number, used for ordering only.
    pub pitch_no: u32,
    /// Ball speed off the bat, mph.
    pub exit_speed: Option<f64>,
    /// Vertical launch angle, degrees.
    pub launch_angle: Option<f64>,
    /// Carry distance, feet.
    pub distance: Option<f64>,
    /// Horizontal spray direction, degrees. Negative = pull side.
    pub direction: Option<f64>,
    /// Free-text outcome label from the warehouse.
    pub play_result: Option<String>,
    /// Lateral contact offset from plate center, feet.
    pub contact_x: Option<f64>,
    /// Contact height off the ground, feet.
    pub contact_y: Option<f64>,
    /// Contact depth relative to the plate front, feet.
    pub contact_z: Option<f64>,
}

impl BattedBallEvent {
    /// The exit speed that gates inclusion in batted-ball aggregates.
    /// Zero readings are sensor artifacts and are treated as missing.
    pub fn batted_ball_ev(&self) -> Option<f64> {
        self.exit_speed.filter(|ev| *ev != 0.0)
    }

    /// The full contact position, when all three axes were measured.
    pub fn contact_position(&self) -> Option<ContactPosition> {
        match (self.contact_x, self.contact_y, self.contact_z) {
            (Some(x), Some(y), Some(z)) => Some(ContactPosition { x, y, z }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EventLoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private): warehouse export format
// ---------------------------------------------------------------------------

/// Warehouse CSV row. Numeric fields stay optional because the feed leaves
/// unmeasured cells empty. Extra columns (Batter, Date, pitch metrics) are
/// absorbed via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawEventRow {
    PitchNo: f64,
    #[serde(default)]
    ExitSpeed: Option<f64>,
    #[serde(default)]
    Angle: Option<f64>,
    #[serde(default)]
    Distance: Option<f64>,
    #[serde(default)]
    Direction: Option<f64>,
    #[serde(default)]
    PlayResult: Option<String>,
    #[serde(default)]
    ContactPositionX: Option<f64>,
    #[serde(default)]
    ContactPositionY: Option<f64>,
    #[serde(default)]
    ContactPositionZ: Option<f64>,
    /// Absorb any extra columns the warehouse includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

/// Returns true if all present values are finite (not NaN or Infinity).
fn all_finite(values: &[Option<f64>]) -> bool {
    values.iter().flatten().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_events_from_reader<R: Read>(rdr: R) -> Result<Vec<BattedBallEvent>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut events = Vec::new();
    for result in reader.deserialize::<RawEventRow>() {
        match result {
            Ok(raw) => {
                if !raw.PitchNo.is_finite() {
                    warn!("skipping row: non-finite PitchNo");
                    continue;
                }
                if !all_finite(&[
                    raw.ExitSpeed,
                    raw.Angle,
                    raw.Distance,
                    raw.Direction,
                    raw.ContactPositionX,
                    raw.ContactPositionY,
                    raw.ContactPositionZ,
                ]) {
                    warn!("skipping pitch {}: non-finite measurement", raw.PitchNo);
                    continue;
                }
                events.push(BattedBallEvent {
                    pitch_no: raw.PitchNo.round() as u32,
                    exit_speed: raw.ExitSpeed,
                    launch_angle: raw.Angle,
                    distance: raw.Distance,
                    direction: raw.Direction,
                    play_result: raw
                        .PlayResult
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty()),
                    contact_x: raw.ContactPositionX,
                    contact_y: raw.ContactPositionY,
                    contact_z: raw.ContactPositionZ,
                });
            }
            Err(e) => {
                warn!("skipping malformed event row: {}", e);
            }
        }
    }
    // Warehouse ordering contract: pitch sequence order.
    events.sort_by_key(|e| e.pitch_no);
    Ok(events)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load batted-ball events from a warehouse CSV export, ordered by pitch
/// number. Malformed rows are skipped with a warning.
pub fn load_events(path: &Path) -> Result<Vec<BattedBallEvent>, EventLoadError> {
    let file = std::fs::File::open(path).map_err(|e| EventLoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_events_from_reader(file).map_err(|e| EventLoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_ev(ev: Option<f64>) -> BattedBallEvent {
        BattedBallEvent {
            pitch_no: 1,
            exit_speed: ev,
            launch_angle: None,
            distance: None,
            direction: None,
            play_result: None,
            contact_x: None,
            contact_y: None,
            contact_z: None,
        }
    }

    #[test]
    fn level_from_label_known_values() {
        assert_eq!(CompetitionLevel::from_label("D2"), CompetitionLevel::D2);
        assert_eq!(CompetitionLevel::from_label("sec"), CompetitionLevel::Sec);
        assert_eq!(CompetitionLevel::from_label(" d3 "), CompetitionLevel::D3);
    }

    #[test]
    fn level_from_label_unknown_defaults_to_d1() {
        assert_eq!(CompetitionLevel::from_label("JUCO"), CompetitionLevel::D1);
        assert_eq!(CompetitionLevel::from_label(""), CompetitionLevel::D1);
    }

    #[test]
    fn zero_exit_speed_is_not_a_batted_ball() {
        assert_eq!(event_with_ev(Some(0.0)).batted_ball_ev(), None);
        assert_eq!(event_with_ev(None).batted_ball_ev(), None);
        assert_eq!(event_with_ev(Some(92.5)).batted_ball_ev(), Some(92.5));
    }

    #[test]
    fn contact_position_requires_all_axes() {
        let mut e = event_with_ev(Some(90.0));
        e.contact_x = Some(0.5);
        e.contact_y = Some(2.8);
        assert!(e.contact_position().is_none());
        e.contact_z = Some(-0.6);
        let pos = e.contact_position().unwrap();
        assert_eq!(pos.x, 0.5);
        assert_eq!(pos.y, 2.8);
        assert_eq!(pos.z, -0.6);
    }

    #[test]
    fn load_events_parses_and_orders_rows() {
        let csv_data = "\
PitchNo,Batter,ExitSpeed,Angle,Distance,Direction,PlayResult,ContactPositionX,ContactPositionY,ContactPositionZ
3,\"Smith, Jack\",96.2,15.0,310.5,-12.0,HomeRun,0.4,2.9,-0.5
1,\"Smith, Jack\",,,,,,,,
2,\"Smith, Jack\",88.0,4.0,120.0,8.0,Single,,,
";
        let events = load_events_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].pitch_no, 1);
        assert_eq!(events[0].exit_speed, None);
        assert_eq!(events[1].pitch_no, 2);
        assert_eq!(events[1].play_result.as_deref(), Some("Single"));
        assert_eq!(events[2].exit_speed, Some(96.2));
        assert!(events[2].contact_position().is_some());
    }

    #[test]
    fn load_events_skips_malformed_rows() {
        let csv_data = "\
PitchNo,ExitSpeed,Angle
1,95.0,12.0
not-a-number,90.0,10.0
2,88.0,6.0
";
        let events = load_events_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].pitch_no, 1);
        assert_eq!(events[1].pitch_no, 2);
    }
}
