use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use super::categorize::categorize;
use super::fingerprint::fingerprint;
use super::rules::RuleSet;
use crate::conf::DetectionConfig;
use crate::model::{Event, Issue};

const DESCRIPTION_CHARS: usize = 150;

/// Groups significant events by fingerprint and categorizes each group.
pub struct IssueDetector {
    rules: RuleSet,
    min_affected_owners: usize,
    include_level: bool,
}

impl Default for IssueDetector {
    fn default() -> Self {
        Self::new(&DetectionConfig::default())
    }
}

impl IssueDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            rules: RuleSet::with_custom(&config.custom_rules),
            min_affected_owners: config.min_affected_owners,
            include_level: config.fingerprint_includes_level,
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Output is ordered by fingerprint and independent of input order.
    pub fn detect(&self, events: &[Event]) -> Vec<Issue> {
        let mut groups: BTreeMap<String, Vec<&Event>> = BTreeMap::new();
        for event in events.iter().filter(|e| e.level.is_significant()) {
            groups
                .entry(fingerprint(event, self.include_level))
                .or_default()
                .push(event);
        }

        info!(events = events.len(), groups = groups.len(), "Grouped significant events");

        let issues: Vec<Issue> = groups
            .into_iter()
            .map(|(fp, members)| self.build_issue(fp, members))
            .filter(|issue| issue.unique_owner_count() >= self.min_affected_owners)
            .collect();

        debug!(issues = issues.len(), min_owners = self.min_affected_owners, "Issues after owner threshold");
        issues
    }

    fn build_issue(&self, fingerprint: String, mut members: Vec<&Event>) -> Issue {
        // Earliest event represents the group
        members.sort_by(|a, b| {
            (a.timestamp, &a.owner, &a.host, &a.session, &a.log_type, a.sequence, &a.message)
                .cmp(&(b.timestamp, &b.owner, &b.host, &b.session, &b.log_type, b.sequence, &b.message))
        });
        let first = members[0];
        let categorization = categorize(&self.rules, first);

        let affected_owners: BTreeSet<String> = members.iter().map(|e| e.owner.clone()).collect();
        let affected_hosts: BTreeSet<String> = members.iter().map(|e| e.host.clone()).collect();

        Issue {
            id: fingerprint.chars().take(8).collect(),
            category: categorization.category,
            severity: categorization.severity.unwrap_or(first.level),
            description: describe(first),
            pattern: format!("Event ID: {}, Source: {}", first.event_id, first.source),
            affected_owners,
            affected_hosts,
            occurrences: members.len(),
            events: members.into_iter().cloned().collect(),
            root_cause: categorization.root_cause,
            solution: categorization.solution,
            fingerprint,
        }
    }
}

/// `"{log_type} - {source}: {message}"`, message cut at 150 characters.
fn describe(event: &Event) -> String {
    let message = if event.message.chars().count() > DESCRIPTION_CHARS {
        let head: String = event.message.chars().take(DESCRIPTION_CHARS).collect();
        format!("{}...", head)
    } else {
        event.message.clone()
    };
    format!("{} - {}: {}", event.log_type, event.source, message)
}
