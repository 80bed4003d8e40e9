// Contact-type classification shared by the projectors and the spray
// statistics.
//
// The two chart views historically used different angle thresholds and
// different missing-angle fallbacks, so the classifier is parameterized per
// call site rather than hard-coding one global rule.

use serde::{Deserialize, Serialize};

use crate::metrics::summary::HARD_HIT_MPH;

// ---------------------------------------------------------------------------
// Ball flight
// ---------------------------------------------------------------------------

/// Batted-ball trajectory bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallFlight {
    GroundBall,
    LineDrive,
    /// Line-drive band contact at hard-hit exit speed. Only produced by
    /// profiles with barrel detection enabled.
    Barrel,
    FlyBall,
    /// Missing launch angle (contact-view fallback).
    Unknown,
    /// Missing launch angle (spray-view fallback).
    Foul,
}

impl BallFlight {
    /// Stable tag used by the rendering collaborator for styling.
    pub fn label(&self) -> &'static str {
        match self {
            BallFlight::GroundBall => "ground-ball",
            BallFlight::LineDrive => "line-drive",
            BallFlight::Barrel => "barrel",
            BallFlight::FlyBall => "fly-ball",
            BallFlight::Unknown => "unknown",
            BallFlight::Foul => "foul",
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier profiles
// ---------------------------------------------------------------------------

/// Per-call-site classification thresholds.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    /// Angles strictly below this are ground balls.
    pub ground_ball_below: f64,
    /// Upper bound (inclusive) of the line-drive band.
    pub line_drive_max: f64,
    /// Whether hard-hit line drives are promoted to barrels.
    pub barrels: bool,
    /// Bucket for events with no launch angle.
    pub missing_angle: BallFlight,
}

/// Contact-point view profile: 8°-32° line-drive band, barrel promotion.
pub const CONTACT_VIEW: Classifier = Classifier {
    ground_ball_below: 8.0,
    line_drive_max: 32.0,
    barrels: true,
    missing_angle: BallFlight::Unknown,
};

/// Spray-chart profile: 10°-25° line-drive band, no barrel promotion.
pub const SPRAY_VIEW: Classifier = Classifier {
    ground_ball_below: 10.0,
    line_drive_max: 25.0,
    barrels: false,
    missing_angle: BallFlight::Foul,
};

impl Classifier {
    /// Bucket one batted ball by launch angle and exit speed.
    pub fn classify(&self, launch_angle: Option<f64>, exit_speed: Option<f64>) -> BallFlight {
        let Some(angle) = launch_angle else {
            return self.missing_angle;
        };
        if angle < self.ground_ball_below {
            BallFlight::GroundBall
        } else if angle <= self.line_drive_max {
            if self.barrels && exit_speed.is_some_and(|ev| ev >= HARD_HIT_MPH) {
                BallFlight::Barrel
            } else {
                BallFlight::LineDrive
            }
        } else {
            BallFlight::FlyBall
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_view_buckets() {
        assert_eq!(CONTACT_VIEW.classify(None, Some(100.0)), BallFlight::Unknown);
        assert_eq!(
            CONTACT_VIEW.classify(Some(5.0), Some(100.0)),
            BallFlight::GroundBall
        );
        assert_eq!(
            CONTACT_VIEW.classify(Some(20.0), Some(90.0)),
            BallFlight::LineDrive
        );
        assert_eq!(
            CONTACT_VIEW.classify(Some(20.0), Some(95.0)),
            BallFlight::Barrel
        );
        assert_eq!(
            CONTACT_VIEW.classify(Some(33.0), Some(100.0)),
            BallFlight::FlyBall
        );
    }

    #[test]
    fn contact_view_band_bounds_inclusive() {
        assert_eq!(
            CONTACT_VIEW.classify(Some(8.0), Some(80.0)),
            BallFlight::LineDrive
        );
        assert_eq!(
            CONTACT_VIEW.classify(Some(32.0), Some(96.0)),
            BallFlight::Barrel
        );
        assert_eq!(
            CONTACT_VIEW.classify(Some(7.99), Some(96.0)),
            BallFlight::GroundBall
        );
    }

    #[test]
    fn spray_view_uses_own_thresholds_and_fallback() {
        assert_eq!(SPRAY_VIEW.classify(None, Some(100.0)), BallFlight::Foul);
        assert_eq!(
            SPRAY_VIEW.classify(Some(9.0), Some(100.0)),
            BallFlight::GroundBall
        );
        // No barrel promotion in the spray profile, even at hard-hit speed.
        assert_eq!(
            SPRAY_VIEW.classify(Some(20.0), Some(105.0)),
            BallFlight::LineDrive
        );
        assert_eq!(
            SPRAY_VIEW.classify(Some(26.0), Some(80.0)),
            BallFlight::FlyBall
        );
    }

    #[test]
    fn missing_exit_speed_never_promotes_to_barrel() {
        assert_eq!(CONTACT_VIEW.classify(Some(20.0), None), BallFlight::LineDrive);
    }
}
