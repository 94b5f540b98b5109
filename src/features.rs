//! Derived behavioral features.
//!
//! Pure, total derivations over the session-assigned, enriched stream, in
//! a fixed order because channel-binge detection reads session-local
//! ordering. Every event receives every field; there are no failure cases.

use chrono::{Datelike, Timelike, Weekday};

use crate::config::PipelineConfig;
use crate::models::{DurationCategory, Season, Session, TimePeriod, WatchEvent};

/// Fill every derived field. Precondition: events sorted by `watched_at`
/// with sessions assigned and enrichment applied.
pub fn derive_features(events: &mut [WatchEvent], sessions: &[Session], config: &PipelineConfig) {
    let binge_sessions: std::collections::HashSet<u64> = sessions
        .iter()
        .filter(|s| s.video_count >= config.binge_threshold_videos)
        .map(|s| s.session_id)
        .collect();

    let mut prev: Option<(u64, String)> = None;

    for event in events.iter_mut() {
        event.weekday = event.watched_at.format("%A").to_string();
        event.hour = event.watched_at.hour();
        event.season = season_of_month(event.watched_at.month());
        event.time_period = period_of_hour(event.hour);
        event.is_weekend = matches!(
            event.watched_at.weekday(),
            Weekday::Sat | Weekday::Sun
        );
        event.duration_category = categorize_duration(event.duration_minutes, config);
        event.is_binge_session = binge_sessions.contains(&event.session_id);

        // Session-scoped shift: the first event of a session never counts.
        event.is_channel_binge = matches!(
            &prev,
            Some((session_id, channel))
                if *session_id == event.session_id && *channel == event.channel
        );
        prev = Some((event.session_id, event.channel.clone()));
    }
}

fn season_of_month(month: u32) -> Season {
    match month {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Fall,
        _ => Season::Winter,
    }
}

fn period_of_hour(hour: u32) -> TimePeriod {
    match hour {
        0..=5 => TimePeriod::Dawn,
        6..=11 => TimePeriod::Morning,
        12..=17 => TimePeriod::Afternoon,
        _ => TimePeriod::Evening,
    }
}

fn categorize_duration(minutes: f64, config: &PipelineConfig) -> DurationCategory {
    if minutes < config.short_max_minutes {
        DurationCategory::Short
    } else if minutes < config.medium_max_minutes {
        DurationCategory::Medium
    } else {
        DurationCategory::Long
    }
}
