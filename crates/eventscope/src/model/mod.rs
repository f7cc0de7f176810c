//! Canonical record shapes shared by every stage of the pipeline.

pub mod event;
pub mod issue;
pub mod report;

pub use event::{Event, Level};
pub use issue::Issue;
pub use report::AnalysisReport;
