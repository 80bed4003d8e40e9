// Report assembly: runs every analysis stage over one hitter's session and
// packages the results for the rendering and delivery collaborators.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::contact::{project_contact, ContactReport};
use crate::chart::spray::{project_spray, SprayReport};
use crate::event::{BattedBallEvent, CompetitionLevel};
use crate::metrics::comparison::{multi_level_comparisons, MultiLevelComparison};
use crate::metrics::summary::{summarize_with_reference, SummaryStatistics};
use crate::reference::ReferenceSource;

/// Everything the renderer needs for one hitter on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitterReport {
    /// Display-ordered name ("Jack Smith"), not the roster key.
    pub hitter: String,
    pub date: NaiveDate,
    /// Pitches seen in the session, batted or not.
    pub total_pitches: usize,
    pub summary: SummaryStatistics,
    /// Absent when the session had no batted balls with exit velocity.
    pub multi_level: Option<MultiLevelComparison>,
    pub contact: ContactReport,
    pub spray: SprayReport,
}

/// Run the full pipeline for one hitter's session.
///
/// Every stage degrades rather than fails: a session with zero batted balls
/// still yields a report with zeroed summary metrics and empty charts.
pub fn build_report(
    hitter_name: &str,
    date: NaiveDate,
    events: &[BattedBallEvent],
    level: CompetitionLevel,
    source: &dyn ReferenceSource,
) -> HitterReport {
    debug!(
        "building report for {} on {} ({} pitches)",
        hitter_name,
        date,
        events.len()
    );

    let summary = summarize_with_reference(events, level, source);
    let multi_level = multi_level_comparisons(events, level, source);
    let contact = project_contact(events);
    let spray = project_spray(events);

    debug!(
        "report assembled: {} batted balls, {} contact points, {} spray points",
        summary.metrics.batted_balls,
        contact.side_view.len(),
        spray.points.len()
    );

    HitterReport {
        hitter: display_name(hitter_name),
        date,
        total_pitches: events.len(),
        summary,
        multi_level,
        contact,
        spray,
    }
}

/// Flip a roster-keyed "Last, First" name into display order. Names without
/// the comma separator pass through unchanged.
pub fn display_name(roster_name: &str) -> String {
    match roster_name.split_once(", ") {
        Some((last, first)) => format!("{first} {last}"),
        None => roster_name.to_string(),
    }
}

/// Plain-text body for the report delivery email.
pub fn summary_email_body(report: &HitterReport) -> String {
    let m = &report.summary.metrics;
    format!(
        "Hi {},\n\n\
         Your hitting performance report for {} is attached as a PDF.\n\n\
         Report Summary:\n\
         - Total At-Bats: {}\n\
         - Average Exit Velocity: {} mph\n\
         - Max Exit Velocity: {} mph\n\
         - 90th Percentile EV: {} mph\n\
         - Barrel Rate: {}%\n\
         - Hard Hit Rate: {}%\n\n\
         Keep up the great work!\n\n\
         Best regards,\n\
         Coaching Staff",
        report.hitter,
        report.date.format("%Y-%m-%d"),
        m.batted_balls,
        m.avg_exit_velo,
        m.max_exit_velo,
        m.percentile_90_ev,
        m.barrel_rate,
        m.hardhit_rate,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{
        ReferenceAverages, ReferenceDistribution, ReferenceError, ReferenceSource,
    };

    struct EmptySource;

    impl ReferenceSource for EmptySource {
        fn averages(
            &self,
            _level: CompetitionLevel,
        ) -> Result<Option<ReferenceAverages>, ReferenceError> {
            Ok(None)
        }

        fn distributions(
            &self,
            _level: CompetitionLevel,
        ) -> Result<Option<ReferenceDistribution>, ReferenceError> {
            Ok(None)
        }
    }

    fn ball(pitch_no: u32, ev: Option<f64>, angle: Option<f64>) -> BattedBallEvent {
        BattedBallEvent {
            pitch_no,
            exit_speed: ev,
            launch_angle: angle,
            distance: None,
            direction: None,
            play_result: None,
            contact_x: None,
            contact_y: None,
            contact_z: None,
        }
    }

    #[test]
    fn display_name_flips_roster_order() {
        assert_eq!(display_name("Smith, Jack"), "Jack Smith");
        assert_eq!(display_name("Cruz Jr., Nelson"), "Nelson Cruz Jr.");
        assert_eq!(display_name("Ichiro"), "Ichiro");
    }

    #[test]
    fn empty_session_still_yields_a_report() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 12).unwrap();
        let report = build_report("Smith, Jack", date, &[], CompetitionLevel::D1, &EmptySource);
        assert_eq!(report.hitter, "Jack Smith");
        assert_eq!(report.total_pitches, 0);
        assert_eq!(report.summary.metrics.batted_balls, 0);
        assert!(report.multi_level.is_none());
        assert!(report.contact.side_view.is_empty());
        assert!(report.spray.points.is_empty());
    }

    #[test]
    fn pitch_count_includes_non_batted_pitches() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 12).unwrap();
        let events = vec![
            ball(1, None, None),
            ball(2, Some(97.0), Some(14.0)),
            ball(3, Some(0.0), None),
        ];
        let report = build_report(
            "Smith, Jack",
            date,
            &events,
            CompetitionLevel::D2,
            &EmptySource,
        );
        assert_eq!(report.total_pitches, 3);
        assert_eq!(report.summary.metrics.batted_balls, 1);
    }

    #[test]
    fn email_body_contains_rounded_metrics() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 12).unwrap();
        let events = vec![
            ball(1, Some(100.0), Some(20.0)),
            ball(2, Some(90.0), Some(5.0)),
            ball(3, Some(96.0), Some(15.0)),
        ];
        let report = build_report(
            "Smith, Jack",
            date,
            &events,
            CompetitionLevel::D1,
            &EmptySource,
        );
        let body = summary_email_body(&report);
        assert!(body.starts_with("Hi Jack Smith,"));
        assert!(body.contains("report for 2024-04-12"));
        assert!(body.contains("- Total At-Bats: 3"));
        assert!(body.contains("- Average Exit Velocity: 95.3 mph"));
        assert!(body.contains("- Max Exit Velocity: 100 mph"));
        assert!(body.contains("- Barrel Rate: 66.7%"));
        assert!(body.contains("Best regards,\nCoaching Staff"));
    }
}
