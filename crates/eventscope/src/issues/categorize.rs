use super::rules::{MatchKind, RuleSet};
use crate::model::{Event, Level};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const GENERIC_ROOT_CAUSE: &str =
    "Issue requires further investigation based on event details and system context";
pub const GENERIC_SOLUTION: &str =
    "Review detailed event information, check related system logs, consult vendor documentation for specific event ID";

/// Substring of source or log type to category, used when no rule matches.
const FALLBACK_CATEGORIES: &[(&str, &str)] = &[
    ("system", "System Configuration"),
    ("application", "Application Issue"),
    ("network", "Network Issue"),
    ("driver", "Driver Issue"),
    ("security", "Security Issue"),
    ("wlan", "Network Connectivity"),
    ("ncsi", "Network Connectivity"),
    ("kernel-power", "System Issues"),
    ("dns", "Network Connectivity"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Categorization {
    pub category: String,
    /// `None` keeps the event's own level
    pub severity: Option<Level>,
    pub root_cause: String,
    pub solution: String,
    /// `None` when the fallback table decided
    pub matched_by: Option<MatchKind>,
}

pub fn categorize(rules: &RuleSet, event: &Event) -> Categorization {
    if let Some((rule, kind)) = rules.find(event) {
        return Categorization {
            category: rule.category.clone(),
            severity: rule.severity,
            root_cause: rule.root_cause.clone(),
            solution: rule.solution.clone(),
            matched_by: Some(kind),
        };
    }

    let source = event.source.to_lowercase();
    let log_type = event.log_type.to_lowercase();
    let category = FALLBACK_CATEGORIES
        .iter()
        .find(|(key, _)| log_type.contains(key) || source.contains(key))
        .map(|(_, category)| *category)
        .unwrap_or(UNCATEGORIZED);

    Categorization {
        category: category.to_string(),
        severity: None,
        root_cause: GENERIC_ROOT_CAUSE.to_string(),
        solution: GENERIC_SOLUTION.to_string(),
        matched_by: None,
    }
}
