//! Event retention filter.
//!
//! Keeps an event iff it falls inside the retention window measured
//! backward from `now` and both title and url are present. Order is
//! preserved; the chronological sort happens later, just before
//! segmentation.

use chrono::{Duration, NaiveDateTime};

use crate::models::WatchEvent;

/// Window cutoff: `retention_years` counted as 365-day years back from
/// `now`, matching the export's own convention.
pub fn retention_cutoff(now: NaiveDateTime, retention_years: u32) -> NaiveDateTime {
    now - Duration::days(365 * i64::from(retention_years))
}

pub fn retain(event: &WatchEvent, cutoff: NaiveDateTime) -> bool {
    !event.title.is_empty() && !event.url.is_empty() && event.watched_at >= cutoff
}

/// Apply the retention filter in place, preserving relative order.
pub fn filter_events(
    events: Vec<WatchEvent>,
    now: NaiveDateTime,
    retention_years: u32,
) -> Vec<WatchEvent> {
    let cutoff = retention_cutoff(now, retention_years);
    events
        .into_iter()
        .filter(|event| retain(event, cutoff))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WatchEvent;
    use chrono::NaiveDate;

    fn event_at(title: &str, url: &str, date: (i32, u32, u32)) -> WatchEvent {
        let watched_at = NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        WatchEvent::new(title.to_string(), url.to_string(), None, watched_at)
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn keeps_recent_event() {
        let events = vec![event_at("t", "u", (2024, 5, 1))];
        assert_eq!(filter_events(events, now(), 3).len(), 1);
    }

    #[test]
    fn drops_event_older_than_window() {
        let events = vec![event_at("t", "u", (2021, 1, 1))];
        assert!(filter_events(events, now(), 3).is_empty());
    }

    #[test]
    fn drops_event_with_missing_fields() {
        let events = vec![
            event_at("", "u", (2024, 5, 1)),
            event_at("t", "", (2024, 5, 2)),
        ];
        assert!(filter_events(events, now(), 3).is_empty());
    }

    #[test]
    fn preserves_input_order() {
        let events = vec![
            event_at("b", "u", (2024, 5, 2)),
            event_at("a", "u", (2024, 5, 1)),
        ];
        let kept = filter_events(events, now(), 3);
        assert_eq!(kept[0].title, "b");
        assert_eq!(kept[1].title, "a");
    }
}
