//! External video metadata model.

use serde::{Deserialize, Serialize};

/// Attributes resolved for one video by the metadata source. Merged into
/// events by `video_id` as a left join; events without a record keep their
/// fallback values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub video_id: String,
    pub channel_title: String,
    pub category_id: String,
    pub duration_minutes: f64,
    pub published_at: String,
}
