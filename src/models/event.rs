//! Watch event data models.
//!
//! A `RawEntry` is one block of the exported history log before any
//! interpretation; a `WatchEvent` is the canonical, fully-enriched record
//! that flows through segmentation, enrichment and feature derivation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One entry of the exported log: display title, destination link, and the
/// free-form timestamp text exactly as it appears in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: String,
    pub url: String,
    pub timestamp_text: String,
}

/// Canonical watch occurrence.
///
/// Fields are populated stage by stage: the parser fills identity and time,
/// the segmenter assigns `session_id`, the classifier sets `topic`, the
/// enricher resolves `channel`/`category`/`duration_minutes`, and the
/// feature deriver fills the rest. After derivation every field is final.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchEvent {
    pub title: String,
    pub url: String,
    /// 11-character token from the `v=` query parameter; absent when the
    /// link does not carry one (playlists, channel pages).
    pub video_id: Option<String>,
    pub watched_at: NaiveDateTime,
    pub duration_minutes: f64,
    pub channel: String,
    pub category: String,
    pub session_id: u64,
    pub topic: Option<String>,
    pub weekday: String,
    pub hour: u32,
    pub season: Season,
    pub time_period: TimePeriod,
    pub is_weekend: bool,
    pub duration_category: DurationCategory,
    pub is_binge_session: bool,
    pub is_channel_binge: bool,
}

impl WatchEvent {
    /// A freshly parsed event: identity and time known, everything else at
    /// its pre-enrichment default.
    pub fn new(
        title: String,
        url: String,
        video_id: Option<String>,
        watched_at: NaiveDateTime,
    ) -> Self {
        Self {
            title,
            url,
            video_id,
            watched_at,
            duration_minutes: 0.0,
            channel: String::new(),
            category: String::new(),
            session_id: 0,
            topic: None,
            weekday: String::new(),
            hour: 0,
            season: Season::Winter,
            time_period: TimePeriod::Dawn,
            is_weekend: false,
            duration_category: DurationCategory::Short,
            is_binge_session: false,
            is_channel_binge: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimePeriod {
    Dawn,
    Morning,
    Afternoon,
    Evening,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Dawn => "Dawn",
            TimePeriod::Morning => "Morning",
            TimePeriod::Afternoon => "Afternoon",
            TimePeriod::Evening => "Evening",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DurationCategory {
    Short,
    Medium,
    Long,
}

impl DurationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationCategory::Short => "Short",
            DurationCategory::Medium => "Medium",
            DurationCategory::Long => "Long",
        }
    }
}
