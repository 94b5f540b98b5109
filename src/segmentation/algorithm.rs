//! Session segmentation.
//!
//! A session is a maximal run of events with no inter-event gap above the
//! threshold. Segmentation is one deterministic left-to-right pass over the
//! chronologically sorted stream: a boundary depends only on the two
//! timestamps spanning it, with no look-ahead. Session statistics are
//! reduced over each session's members after the pass.

use chrono::Duration;

use crate::models::{Session, WatchEvent};

/// Sort events ascending by watch time. The sort is stable, so events with
/// identical timestamps keep their original log order.
pub fn sort_events(events: &mut [WatchEvent]) {
    events.sort_by_key(|event| event.watched_at);
}

/// Main segmentation function: assigns a `session_id` to every event and
/// returns the per-session statistics.
///
/// Precondition: `events` sorted ascending by `watched_at`.
pub fn segment_events(events: &mut [WatchEvent], gap_minutes: i64) -> Vec<Session> {
    // Edge case: empty stream
    if events.is_empty() {
        return Vec::new();
    }

    let gap = Duration::minutes(gap_minutes);

    // Single pass: the first event always opens session 0; afterwards a
    // new session starts exactly when the gap to the previous event
    // exceeds the threshold.
    let mut session_counter: u64 = 0;
    let mut prev_time = events[0].watched_at;

    for (i, event) in events.iter_mut().enumerate() {
        if i > 0 && event.watched_at - prev_time > gap {
            session_counter += 1;
        }
        event.session_id = session_counter;
        prev_time = event.watched_at;
    }

    collect_session_stats(events)
}

/// Reduce each session's member events into its statistics. Sessions are
/// contiguous in the sorted stream, so one forward scan suffices.
fn collect_session_stats(events: &[WatchEvent]) -> Vec<Session> {
    let mut sessions: Vec<Session> = Vec::new();

    for event in events {
        match sessions.last_mut() {
            Some(session) if session.session_id == event.session_id => {
                session.end = event.watched_at;
                session.video_count += 1;
            }
            _ => {
                sessions.push(Session {
                    session_id: event.session_id,
                    start: event.watched_at,
                    end: event.watched_at,
                    video_count: 1,
                    duration_minutes: 0.0,
                });
            }
        }
    }

    for session in &mut sessions {
        session.duration_minutes = (session.end - session.start).num_seconds() as f64 / 60.0;
    }

    sessions
}
