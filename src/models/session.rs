//! Viewing session data model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A maximal run of events with no inter-event gap above the configured
/// threshold. Sessions partition the event stream: every event belongs to
/// exactly one, and they are contiguous in time order. Built in a single
/// pass by the segmenter and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: u64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub video_count: usize,
    /// `end - start` in minutes; a single-event session has 0.
    pub duration_minutes: f64,
}
