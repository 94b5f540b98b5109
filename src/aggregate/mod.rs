pub mod tables;

pub use tables::{build_reports, Reports};
