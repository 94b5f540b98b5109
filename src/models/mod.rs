pub mod event;
pub mod metadata;
pub mod session;

pub use event::{DurationCategory, RawEntry, Season, TimePeriod, WatchEvent};
pub use metadata::MetadataRecord;
pub use session::Session;
