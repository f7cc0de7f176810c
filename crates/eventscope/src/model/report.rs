use std::collections::HashSet;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use super::event::Event;
use super::issue::Issue;
use crate::issues::rank_issues;

/// Snapshot of one analysis pass. Read-only once built.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: NaiveDateTime,
    pub total_owners: usize,
    pub total_hosts: usize,
    pub total_events: usize,
    pub issues: Vec<Issue>,
}

impl AnalysisReport {
    pub fn build(events: &[Event], issues: Vec<Issue>) -> Self {
        let owners: HashSet<&str> = events.iter().map(|e| e.owner.as_str()).collect();
        let hosts: HashSet<&str> = events.iter().map(|e| e.host.as_str()).collect();

        Self {
            generated_at: Local::now().naive_local(),
            total_owners: owners.len(),
            total_hosts: hosts.len(),
            total_events: events.len(),
            issues,
        }
    }

    /// Issues in presentation order (see [`rank_issues`]).
    pub fn sorted_issues(&self) -> Vec<Issue> {
        rank_issues(self.issues.clone())
    }
}
