//! Issues module: fingerprinting, grouping, categorization and ranking.

pub mod categorize;
pub mod detect;
pub mod fingerprint;
pub mod rank;
pub mod rules;

pub use categorize::{categorize, Categorization, UNCATEGORIZED};
pub use detect::IssueDetector;
pub use fingerprint::{fingerprint, normalize_message};
pub use rank::rank_issues;
pub use rules::{MatchKind, Rule, RuleError, RuleSet};

use crate::model::{Event, Issue};

/// Detect issues with the built-in rule table and default settings.
pub fn detect_issues(events: &[Event]) -> Vec<Issue> {
    IssueDetector::default().detect(events)
}
