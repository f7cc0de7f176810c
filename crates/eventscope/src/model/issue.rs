use std::collections::BTreeSet;
use serde::Serialize;

use super::event::{Event, Level};

/// A group of significant events sharing one fingerprint.
///
/// `occurrences` always equals `events.len()`.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    /// First 8 characters of the fingerprint
    pub id: String,
    /// Full fingerprint digest shared by every member event
    pub fingerprint: String,
    pub category: String,
    pub severity: Level,
    pub description: String,
    /// `"Event ID: {id}, Source: {source}"`
    pub pattern: String,
    pub affected_owners: BTreeSet<String>,
    pub affected_hosts: BTreeSet<String>,
    pub occurrences: usize,
    pub events: Vec<Event>,
    pub root_cause: String,
    pub solution: String,
}

impl Issue {
    pub fn unique_owner_count(&self) -> usize {
        self.affected_owners.len()
    }

    pub fn unique_host_count(&self) -> usize {
        self.affected_hosts.len()
    }
}
