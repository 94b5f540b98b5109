//! Pipeline orchestration.
//!
//! One batch run: ingest -> parse -> filter -> sort -> segment ->
//! classify -> enrich -> derive -> aggregate -> write. Stages own their
//! state (the segmenter its session counter, the enricher its metadata
//! map); the pipeline only threads data left to right. Parse and lookup
//! failures never abort the stages downstream of them.

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;
use log::info;

use crate::aggregate::{build_reports, Reports};
use crate::classify::TopicClassifier;
use crate::config::PipelineConfig;
use crate::enrich::{Enricher, MetadataSource};
use crate::features::derive_features;
use crate::filter::filter_events;
use crate::ingest::HistoryReader;
use crate::models::{RawEntry, Session, WatchEvent};
use crate::parser::EventParser;
use crate::report::ReportWriter;
use crate::segmentation::{segment_events, sort_events};

/// Diagnostic counts for one run. Locally-recovered failures (dropped
/// entries, failed lookup batches) surface here and nowhere else.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub entries_seen: usize,
    pub parse_drops: usize,
    pub filter_drops: usize,
    pub events: usize,
    pub sessions: usize,
    pub distinct_videos: usize,
    pub resolved_videos: usize,
    pub failed_lookup_batches: usize,
    pub artifacts_written: Vec<String>,
    pub artifacts_failed: Vec<(String, String)>,
}

/// The analyzed stream before any artifact is written.
pub struct Analysis {
    pub events: Vec<WatchEvent>,
    pub sessions: Vec<Session>,
    pub reports: Reports,
    pub summary: RunSummary,
}

pub struct Pipeline {
    config: PipelineConfig,
    classifier: Box<dyn TopicClassifier>,
    source: Option<Box<dyn MetadataSource>>,
}

impl Pipeline {
    /// Fails fast on an invalid configuration; nothing runs after that.
    pub fn new(
        config: PipelineConfig,
        classifier: Box<dyn TopicClassifier>,
        source: Option<Box<dyn MetadataSource>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            classifier,
            source,
        })
    }

    /// Full run against an exported history file.
    pub fn run(&self, input: &Path, out_dir: &Path, now: NaiveDateTime) -> Result<RunSummary> {
        let reader = HistoryReader::new()?;
        let entries = reader.read_file(input)?;
        info!("Ingested {} raw entries from {}", entries.len(), input.display());

        let mut analysis = self.analyze(entries, now)?;

        let writer = ReportWriter::new(out_dir)?;
        let outcome = writer.write_all(&analysis.events, &analysis.reports);
        analysis.summary.artifacts_written = outcome.written;
        analysis.summary.artifacts_failed = outcome.failed;

        Ok(analysis.summary)
    }

    /// Everything up to (not including) artifact writing.
    pub fn analyze(&self, entries: Vec<RawEntry>, now: NaiveDateTime) -> Result<Analysis> {
        let mut summary = RunSummary {
            entries_seen: entries.len(),
            ..Default::default()
        };

        let parser = EventParser::new()?;
        let parsed: Vec<WatchEvent> = entries
            .iter()
            .filter_map(|entry| parser.parse_entry(entry))
            .collect();
        summary.parse_drops = summary.entries_seen - parsed.len();

        let parsed_count = parsed.len();
        let mut events = filter_events(parsed, now, self.config.retention_years);
        summary.filter_drops = parsed_count - events.len();
        info!(
            "{} events kept ({} unparsable, {} outside retention)",
            events.len(),
            summary.parse_drops,
            summary.filter_drops
        );

        sort_events(&mut events);
        let sessions = segment_events(&mut events, self.config.session_gap_minutes);
        info!("Segmented into {} sessions", sessions.len());

        for event in &mut events {
            event.topic = self.classifier.classify(&event.title);
        }

        let enricher = Enricher::new(self.source.as_deref(), self.config.api_batch_size);
        let stats = enricher.enrich(&mut events);
        info!(
            "Enriched {} of {} distinct videos ({} failed batches)",
            stats.resolved_videos, stats.distinct_videos, stats.failed_batches
        );

        derive_features(&mut events, &sessions, &self.config);

        let reports = build_reports(&events, &sessions, &self.config);

        summary.events = events.len();
        summary.sessions = sessions.len();
        summary.distinct_videos = stats.distinct_videos;
        summary.resolved_videos = stats.resolved_videos;
        summary.failed_lookup_batches = stats.failed_batches;

        Ok(Analysis {
            events,
            sessions,
            reports,
            summary,
        })
    }
}
