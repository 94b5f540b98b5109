//! Metadata enrichment.
//!
//! Resolves per-video attributes through batched external lookups and
//! merges them into the event stream as a left join by `video_id`. Every
//! failure is local: a failed batch is logged, counted, and its members
//! fall back to heuristic values. Enrichment is total: after it, every
//! event has a non-empty channel, category and duration.

pub mod duration;
pub mod source;
pub mod youtube;

pub use source::MetadataSource;
pub use youtube::YouTubeSource;

use std::collections::HashMap;

use log::{info, warn};

use crate::models::{MetadataRecord, WatchEvent};

/// Counters surfaced in the run summary; lookup failures never abort the
/// pipeline, they only show up here.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentStats {
    pub distinct_videos: usize,
    pub resolved_videos: usize,
    pub failed_batches: usize,
}

pub struct Enricher<'a> {
    source: Option<&'a dyn MetadataSource>,
    batch_size: usize,
}

impl<'a> Enricher<'a> {
    pub fn new(source: Option<&'a dyn MetadataSource>, batch_size: usize) -> Self {
        Self { source, batch_size }
    }

    /// Resolve metadata and merge it into the events. Returns the lookup
    /// counters for the run summary.
    pub fn enrich(&self, events: &mut [WatchEvent]) -> EnrichmentStats {
        let ids = distinct_video_ids(events);
        let mut stats = EnrichmentStats {
            distinct_videos: ids.len(),
            ..Default::default()
        };

        let metadata = self.fetch_all(&ids, &mut stats);
        stats.resolved_videos = metadata.len();

        merge_metadata(events, &metadata);
        stats
    }

    /// Issue one lookup call per batch of ids. Batches are independent;
    /// a failed one contributes nothing to the accumulated map.
    fn fetch_all(&self, ids: &[String], stats: &mut EnrichmentStats) -> MetadataMap {
        let mut metadata = MetadataMap::new();

        let source = match self.source {
            Some(source) => source,
            None => {
                info!("No metadata source configured; every event takes the fallback path");
                return metadata;
            }
        };

        for batch in ids.chunks(self.batch_size) {
            match source.fetch_batch(batch) {
                Ok(records) => {
                    for record in records {
                        metadata.insert(record.video_id.clone(), record);
                    }
                }
                Err(err) => {
                    warn!("Metadata batch of {} ids failed: {err:#}", batch.len());
                    stats.failed_batches += 1;
                }
            }
        }

        metadata
    }
}

type MetadataMap = HashMap<String, MetadataRecord>;

/// Distinct ids in first-seen order, so batch composition is deterministic
/// for identical input.
fn distinct_video_ids(events: &[WatchEvent]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut ids = Vec::new();
    for event in events {
        if let Some(id) = &event.video_id {
            if seen.insert(id.clone()) {
                ids.push(id.clone());
            }
        }
    }
    ids
}

/// Left join: events with a record take the external values, the rest keep
/// fallback values derived from what the pipeline already knows.
fn merge_metadata(events: &mut [WatchEvent], metadata: &MetadataMap) {
    for event in events {
        let record = event
            .video_id
            .as_ref()
            .and_then(|id| metadata.get(id));

        match record {
            Some(record) => {
                event.channel = record.channel_title.clone();
                event.category = record.category_id.clone();
                event.duration_minutes = record.duration_minutes;
            }
            None => {
                event.channel = fallback_channel(&event.title);
                event.category = event
                    .topic
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string());
                // duration_minutes keeps whatever the parser carried forward
            }
        }
    }
}

/// Heuristic channel guess: the first whitespace-delimited token of the
/// title. Known limitation: multi-word channel names get truncated.
fn fallback_channel(title: &str) -> String {
    title
        .split_whitespace()
        .next()
        .unwrap_or("Unknown")
        .to_string()
}
