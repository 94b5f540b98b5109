pub mod algorithm;

pub use algorithm::{segment_events, sort_events};
