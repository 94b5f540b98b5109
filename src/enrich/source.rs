//! Metadata lookup capability.

use anyhow::Result;

use crate::models::MetadataRecord;

/// Batch lookup of external video attributes. One call resolves up to the
/// service's batch limit of ids; an `Err` means the whole batch failed and
/// its members take the fallback path.
pub trait MetadataSource {
    fn fetch_batch(&self, video_ids: &[String]) -> Result<Vec<MetadataRecord>>;
}
