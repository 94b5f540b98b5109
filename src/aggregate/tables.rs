//! Aggregate report tables.
//!
//! Each table is an independent grouped reduction over the enriched event
//! stream (plus the session list); no table feeds another. Group orders and
//! tie-breakers are fixed so identical input always renders identically.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::config::PipelineConfig;
use crate::models::{Session, WatchEvent};

pub const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Watch counts per weekday and hour; rows follow `WEEKDAY_ORDER`.
#[derive(Debug, Clone)]
pub struct HeatmapRow {
    pub weekday: &'static str,
    pub hours: [u64; 24],
}

#[derive(Debug, Clone)]
pub struct ChannelStats {
    pub channel: String,
    pub videos: usize,
    pub minutes: f64,
    pub avg_duration: f64,
}

#[derive(Debug, Clone)]
pub struct CategoryStats {
    pub category: String,
    pub videos: usize,
    pub minutes: f64,
}

#[derive(Debug, Clone)]
pub struct TopicStats {
    pub topic: String,
    pub videos: usize,
    pub minutes: f64,
}

#[derive(Debug, Clone)]
pub struct SessionStats {
    pub session_id: u64,
    pub videos: usize,
    pub duration_minutes: f64,
    pub watch_minutes: f64,
    pub start: chrono::NaiveDateTime,
    pub end: chrono::NaiveDateTime,
    pub is_binge: bool,
}

#[derive(Debug, Clone)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub videos: usize,
    pub minutes: f64,
    pub sessions: usize,
}

/// All summary tables for one run.
#[derive(Debug, Clone)]
pub struct Reports {
    pub heatmap: Vec<HeatmapRow>,
    pub top_channels: Vec<ChannelStats>,
    pub categories: Vec<CategoryStats>,
    pub topics: Vec<TopicStats>,
    pub sessions: Vec<SessionStats>,
    pub daily: Vec<DailyStats>,
    pub binge_sessions: Vec<SessionStats>,
}

pub fn build_reports(
    events: &[WatchEvent],
    sessions: &[Session],
    config: &PipelineConfig,
) -> Reports {
    let session_table = session_stats(events, sessions, config);
    let binge_sessions = session_table
        .iter()
        .filter(|s| s.is_binge)
        .cloned()
        .collect();

    Reports {
        heatmap: weekday_hour_matrix(events),
        top_channels: top_channels(events, config.top_channel_limit),
        categories: category_stats(events),
        topics: topic_stats(events),
        sessions: session_table,
        daily: daily_stats(events),
        binge_sessions,
    }
}

fn weekday_hour_matrix(events: &[WatchEvent]) -> Vec<HeatmapRow> {
    let mut counts: HashMap<&str, [u64; 24]> = HashMap::new();
    for event in events {
        let row = counts.entry(weekday_key(&event.weekday)).or_insert([0; 24]);
        row[event.hour as usize % 24] += 1;
    }

    WEEKDAY_ORDER
        .iter()
        .map(|weekday| HeatmapRow {
            weekday,
            hours: counts.get(weekday).copied().unwrap_or([0; 24]),
        })
        .collect()
}

fn weekday_key(weekday: &str) -> &'static str {
    WEEKDAY_ORDER
        .iter()
        .find(|known| **known == weekday)
        .copied()
        .unwrap_or("Monday")
}

fn top_channels(events: &[WatchEvent], limit: usize) -> Vec<ChannelStats> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for event in events {
        let entry = groups.entry(event.channel.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += event.duration_minutes;
    }

    let mut rows: Vec<ChannelStats> = groups
        .into_iter()
        .map(|(channel, (videos, minutes))| ChannelStats {
            channel: channel.to_string(),
            videos,
            minutes,
            avg_duration: minutes / videos as f64,
        })
        .collect();

    // Count descending; the BTreeMap source makes name order the tie-break.
    rows.sort_by(|a, b| b.videos.cmp(&a.videos).then(a.channel.cmp(&b.channel)));
    rows.truncate(limit);
    rows
}

fn category_stats(events: &[WatchEvent]) -> Vec<CategoryStats> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for event in events {
        let entry = groups.entry(event.category.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += event.duration_minutes;
    }

    let mut rows: Vec<CategoryStats> = groups
        .into_iter()
        .map(|(category, (videos, minutes))| CategoryStats {
            category: category.to_string(),
            videos,
            minutes,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.minutes
            .total_cmp(&a.minutes)
            .then(a.category.cmp(&b.category))
    });
    rows
}

fn topic_stats(events: &[WatchEvent]) -> Vec<TopicStats> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for event in events {
        let topic = event.topic.as_deref().unwrap_or("Unknown");
        let entry = groups.entry(topic).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += event.duration_minutes;
    }

    let mut rows: Vec<TopicStats> = groups
        .into_iter()
        .map(|(topic, (videos, minutes))| TopicStats {
            topic: topic.to_string(),
            videos,
            minutes,
        })
        .collect();

    rows.sort_by(|a, b| b.videos.cmp(&a.videos).then(a.topic.cmp(&b.topic)));
    rows
}

fn session_stats(
    events: &[WatchEvent],
    sessions: &[Session],
    config: &PipelineConfig,
) -> Vec<SessionStats> {
    let mut watch_minutes: HashMap<u64, f64> = HashMap::new();
    for event in events {
        *watch_minutes.entry(event.session_id).or_insert(0.0) += event.duration_minutes;
    }

    sessions
        .iter()
        .map(|session| SessionStats {
            session_id: session.session_id,
            videos: session.video_count,
            duration_minutes: session.duration_minutes,
            watch_minutes: watch_minutes
                .get(&session.session_id)
                .copied()
                .unwrap_or(0.0),
            start: session.start,
            end: session.end,
            is_binge: session.video_count >= config.binge_threshold_videos,
        })
        .collect()
}

fn daily_stats(events: &[WatchEvent]) -> Vec<DailyStats> {
    let mut groups: BTreeMap<NaiveDate, (usize, f64, std::collections::HashSet<u64>)> =
        BTreeMap::new();
    for event in events {
        let entry = groups
            .entry(event.watched_at.date())
            .or_insert((0, 0.0, std::collections::HashSet::new()));
        entry.0 += 1;
        entry.1 += event.duration_minutes;
        entry.2.insert(event.session_id);
    }

    groups
        .into_iter()
        .map(|(date, (videos, minutes, session_ids))| DailyStats {
            date,
            videos,
            minutes,
            sessions: session_ids.len(),
        })
        .collect()
}
