//! Raw entry parsing.
//!
//! Turns one `RawEntry` into zero or one canonical `WatchEvent`. The
//! timestamp text is locale-specific (`YYYY. MM. DD.` with Korean AM/PM
//! marker words and a trailing timezone tag); it is normalized to a fixed
//! machine-readable form before parsing. Entries that cannot be parsed are
//! dropped silently, never surfaced as pipeline failures.

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use regex::Regex;

use crate::models::{RawEntry, WatchEvent};

/// Link of the account-controls housekeeping page; a known non-content URL
/// that the exporter interleaves with real watch entries.
const ACTIVITY_CONTROLS_URL: &str = "https://myaccount.google.com/activitycontrols";

const TIMESTAMP_FORMAT: &str = "%Y. %m. %d. %p %I:%M:%S";

pub struct EventParser {
    video_id_regex: Regex,
}

impl EventParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            video_id_regex: Regex::new(r"v=([\w-]{11})")
                .map_err(|e| anyhow!("invalid video id pattern: {e}"))?,
        })
    }

    /// Parse one entry. Returns `None` (entry dropped) when the entry has
    /// no link, the link is the account-controls page, or the timestamp
    /// text does not match the expected pattern.
    pub fn parse_entry(&self, entry: &RawEntry) -> Option<WatchEvent> {
        if entry.url.is_empty() || entry.url.contains(ACTIVITY_CONTROLS_URL) {
            return None;
        }

        let watched_at = parse_timestamp(&entry.timestamp_text)?;
        let video_id = self.extract_video_id(&entry.url);

        Some(WatchEvent::new(
            entry.title.clone(),
            entry.url.clone(),
            video_id,
            watched_at,
        ))
    }

    pub fn extract_video_id(&self, url: &str) -> Option<String> {
        self.video_id_regex
            .captures(url)
            .map(|caps| caps[1].to_string())
    }
}

/// Normalize the locale-specific markers to a parseable form: AM/PM words
/// to their fixed tokens, timezone tag stripped, surrounding space trimmed.
pub fn normalize_timestamp(text: &str) -> String {
    text.replace("오전", "AM")
        .replace("오후", "PM")
        .replace("KST", "")
        .trim()
        .to_string()
}

pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&normalize_timestamp(text), TIMESTAMP_FORMAT).ok()
}

/// Canonical rendering of a parsed timestamp; `parse_timestamp` recovers
/// the same instant from it.
pub fn render_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, url: &str, timestamp_text: &str) -> RawEntry {
        RawEntry {
            title: title.to_string(),
            url: url.to_string(),
            timestamp_text: timestamp_text.to_string(),
        }
    }

    #[test]
    fn parses_afternoon_timestamp() {
        let parsed = parse_timestamp("2024. 3. 15. 오후 9:12:44 KST").unwrap();
        assert_eq!(render_timestamp(&parsed), "2024. 03. 15. PM 09:12:44");
    }

    #[test]
    fn parses_morning_timestamp() {
        let parsed = parse_timestamp("2023. 11. 2. 오전 6:01:09 KST").unwrap();
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "06:01:09");
    }

    #[test]
    fn timestamp_round_trips_at_second_precision() {
        let original = parse_timestamp("2024. 7. 1. 오전 12:30:05 KST").unwrap();
        let reparsed = parse_timestamp(&render_timestamp(&original)).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn rejects_unrecognized_timestamp() {
        assert!(parse_timestamp("March 15, 2024 at 9:12 PM").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn extracts_eleven_character_video_id() {
        let parser = EventParser::new().unwrap();
        assert_eq!(
            parser.extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            parser.extract_video_id("https://www.youtube.com/playlist?list=PL123"),
            None
        );
    }

    #[test]
    fn drops_account_controls_entry_even_when_recent() {
        let parser = EventParser::new().unwrap();
        let dropped = entry(
            "Activity controls",
            "https://myaccount.google.com/activitycontrols?product=youtube",
            "2024. 3. 15. 오후 9:12:44 KST",
        );
        assert!(parser.parse_entry(&dropped).is_none());
    }

    #[test]
    fn drops_entry_without_link() {
        let parser = EventParser::new().unwrap();
        let dropped = entry("orphan", "", "2024. 3. 15. 오후 9:12:44 KST");
        assert!(parser.parse_entry(&dropped).is_none());
    }

    #[test]
    fn parses_well_formed_entry() {
        let parser = EventParser::new().unwrap();
        let event = parser
            .parse_entry(&entry(
                "Some video",
                "https://www.youtube.com/watch?v=abcdefghijk",
                "2024. 3. 15. 오후 9:12:44 KST",
            ))
            .unwrap();
        assert_eq!(event.video_id.as_deref(), Some("abcdefghijk"));
        assert_eq!(event.duration_minutes, 0.0);
        assert_eq!(
            event.watched_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-03-15 21:12:44"
        );
    }
}
