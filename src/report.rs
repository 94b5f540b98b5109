//! CSV artifact writing.
//!
//! Every table renders fully in memory and lands on disk in one write, so
//! an artifact either exists complete or not at all. A failed write is
//! fatal for that artifact only: earlier artifacts stand, later ones still
//! run, and the outcome records what failed.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{error, info};

use crate::aggregate::Reports;
use crate::models::WatchEvent;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which artifacts made it to disk and which did not.
#[derive(Debug, Default)]
pub struct WriteOutcome {
    pub written: Vec<String>,
    pub failed: Vec<(String, String)>,
}

pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(out_dir: &Path) -> Result<Self> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
        Ok(Self {
            out_dir: out_dir.to_path_buf(),
        })
    }

    pub fn write_all(&self, events: &[WatchEvent], reports: &Reports) -> WriteOutcome {
        let artifacts: [(&str, String); 8] = [
            ("enriched_events.csv", render_events(events)),
            ("watch_heatmap_weekday_hour.csv", render_heatmap(reports)),
            ("top_channels.csv", render_channels(reports)),
            ("watch_by_category.csv", render_categories(reports)),
            ("topic_summary.csv", render_topics(reports)),
            ("session_stats.csv", render_sessions(reports)),
            ("daily_stats.csv", render_daily(reports)),
            ("binge_sessions.csv", render_binges(reports)),
        ];

        let mut outcome = WriteOutcome::default();
        for (name, contents) in artifacts {
            let path = self.out_dir.join(name);
            match fs::write(&path, contents) {
                Ok(()) => {
                    info!("Wrote {}", path.display());
                    outcome.written.push(name.to_string());
                }
                Err(err) => {
                    error!("Failed to write {}: {err}", path.display());
                    outcome.failed.push((name.to_string(), err.to_string()));
                }
            }
        }
        outcome
    }
}

fn render_events(events: &[WatchEvent]) -> String {
    let mut out = String::from(
        "title,url,video_id,watched_at,duration_minutes,channel,category,session_id,topic,\
         weekday,hour,season,time_period,is_weekend,duration_category,is_binge_session,\
         is_channel_binge\n",
    );
    for e in events {
        push_row(
            &mut out,
            &[
                escape(&e.title),
                escape(&e.url),
                escape(e.video_id.as_deref().unwrap_or_default()),
                format_time(&e.watched_at),
                e.duration_minutes.to_string(),
                escape(&e.channel),
                escape(&e.category),
                e.session_id.to_string(),
                escape(e.topic.as_deref().unwrap_or_default()),
                e.weekday.clone(),
                e.hour.to_string(),
                e.season.as_str().to_string(),
                e.time_period.as_str().to_string(),
                e.is_weekend.to_string(),
                e.duration_category.as_str().to_string(),
                e.is_binge_session.to_string(),
                e.is_channel_binge.to_string(),
            ],
        );
    }
    out
}

fn render_heatmap(reports: &Reports) -> String {
    let mut out = String::from("weekday");
    for hour in 0..24 {
        out.push_str(&format!(",{hour}"));
    }
    out.push('\n');
    for row in &reports.heatmap {
        out.push_str(row.weekday);
        for count in row.hours {
            out.push_str(&format!(",{count}"));
        }
        out.push('\n');
    }
    out
}

fn render_channels(reports: &Reports) -> String {
    let mut out = String::from("channel,videos,minutes,avg_duration\n");
    for row in &reports.top_channels {
        push_row(
            &mut out,
            &[
                escape(&row.channel),
                row.videos.to_string(),
                row.minutes.to_string(),
                row.avg_duration.to_string(),
            ],
        );
    }
    out
}

fn render_categories(reports: &Reports) -> String {
    let mut out = String::from("category,videos,minutes\n");
    for row in &reports.categories {
        push_row(
            &mut out,
            &[
                escape(&row.category),
                row.videos.to_string(),
                row.minutes.to_string(),
            ],
        );
    }
    out
}

fn render_topics(reports: &Reports) -> String {
    let mut out = String::from("topic,videos,minutes\n");
    for row in &reports.topics {
        push_row(
            &mut out,
            &[
                escape(&row.topic),
                row.videos.to_string(),
                row.minutes.to_string(),
            ],
        );
    }
    out
}

fn render_sessions(reports: &Reports) -> String {
    let mut out =
        String::from("session_id,videos,duration_minutes,watch_minutes,start,end,is_binge\n");
    for row in &reports.sessions {
        push_row(
            &mut out,
            &[
                row.session_id.to_string(),
                row.videos.to_string(),
                row.duration_minutes.to_string(),
                row.watch_minutes.to_string(),
                format_time(&row.start),
                format_time(&row.end),
                row.is_binge.to_string(),
            ],
        );
    }
    out
}

fn render_daily(reports: &Reports) -> String {
    let mut out = String::from("date,videos,minutes,sessions\n");
    for row in &reports.daily {
        push_row(
            &mut out,
            &[
                row.date.format("%Y-%m-%d").to_string(),
                row.videos.to_string(),
                row.minutes.to_string(),
                row.sessions.to_string(),
            ],
        );
    }
    out
}

fn render_binges(reports: &Reports) -> String {
    let mut out = String::from("session_id,videos,duration_minutes,watch_minutes\n");
    for row in &reports.binge_sessions {
        push_row(
            &mut out,
            &[
                row.session_id.to_string(),
                row.videos.to_string(),
                row.duration_minutes.to_string(),
                row.watch_minutes.to_string(),
            ],
        );
    }
    out
}

fn push_row(out: &mut String, fields: &[String]) {
    out.push_str(&fields.join(","));
    out.push('\n');
}

fn format_time(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIME_FORMAT).to_string()
}

/// RFC-4180 style quoting: fields containing a comma, quote or newline are
/// wrapped in quotes with inner quotes doubled.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::build_reports;
    use crate::config::PipelineConfig;
    use crate::features::derive_features;
    use crate::segmentation::segment_events;
    use chrono::NaiveDate;

    fn fixture() -> (Vec<WatchEvent>, Reports) {
        let config = PipelineConfig::default();
        let watched_at = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(21, 12, 44)
            .unwrap();
        let mut event = WatchEvent::new(
            "Comma, in \"title\"".into(),
            "https://www.youtube.com/watch?v=abcdefghijk".into(),
            Some("abcdefghijk".into()),
            watched_at,
        );
        event.channel = "chan".into();
        event.category = "10".into();
        let mut events = vec![event];
        let sessions = segment_events(&mut events, config.session_gap_minutes);
        derive_features(&mut events, &sessions, &config);
        let reports = build_reports(&events, &sessions, &config);
        (events, reports)
    }

    #[test]
    fn escapes_commas_and_quotes() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn event_table_has_header_and_quoted_title() {
        let (events, _) = fixture();
        let rendered = render_events(&events);
        let mut lines = rendered.lines();
        assert!(lines.next().unwrap().starts_with("title,url,video_id"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"Comma, in \"\"title\"\"\","));
        assert!(row.contains("2024-03-15 21:12:44"));
    }

    #[test]
    fn heatmap_has_25_columns_and_7_rows() {
        let (_, reports) = fixture();
        let rendered = render_heatmap(&reports);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].split(',').count(), 25);
        assert!(lines[1].starts_with("Monday,"));
        assert!(lines[7].starts_with("Sunday,"));
    }

    #[test]
    fn writes_all_artifacts() {
        let (events, reports) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();

        let outcome = writer.write_all(&events, &reports);

        assert_eq!(outcome.written.len(), 8);
        assert!(outcome.failed.is_empty());
        assert!(dir.path().join("session_stats.csv").exists());
        assert!(dir.path().join("binge_sessions.csv").exists());
    }

    #[test]
    fn failed_artifact_does_not_stop_the_rest() {
        let (events, reports) = fixture();
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the artifact name forces a write error.
        fs::create_dir(dir.path().join("top_channels.csv")).unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();

        let outcome = writer.write_all(&events, &reports);

        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, "top_channels.csv");
        assert_eq!(outcome.written.len(), 7);
        assert!(dir.path().join("daily_stats.csv").exists());
    }
}
