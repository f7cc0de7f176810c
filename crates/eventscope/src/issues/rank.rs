use std::cmp::Reverse;

use crate::model::Issue;

/// Most owners affected first, then higher severity, then more occurrences.
/// Fingerprint breaks remaining ties.
pub fn rank_issues(mut issues: Vec<Issue>) -> Vec<Issue> {
    issues.sort_by(|a, b| {
        (Reverse(a.unique_owner_count()), a.severity.rank(), Reverse(a.occurrences), &a.fingerprint)
            .cmp(&(Reverse(b.unique_owner_count()), b.severity.rank(), Reverse(b.occurrences), &b.fingerprint))
    });
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use crate::model::Level;

    fn issue(fingerprint: &str, owners: &[&str], severity: Level, occurrences: usize) -> Issue {
        Issue {
            id: fingerprint.chars().take(8).collect(),
            fingerprint: fingerprint.to_string(),
            category: "Test".to_string(),
            severity,
            description: String::new(),
            pattern: String::new(),
            affected_owners: owners.iter().map(|o| o.to_string()).collect(),
            affected_hosts: BTreeSet::new(),
            occurrences,
            events: Vec::new(),
            root_cause: String::new(),
            solution: String::new(),
        }
    }

    fn order(issues: Vec<Issue>) -> Vec<String> {
        rank_issues(issues).into_iter().map(|i| i.fingerprint).collect()
    }

    #[test]
    fn test_owner_count_dominates_severity() {
        let ranked = order(vec![
            issue("b", &["u1"], Level::Critical, 50),
            issue("a", &["u1", "u2", "u3"], Level::Warning, 1),
        ]);
        assert_eq!(ranked, vec!["a", "b"]);
    }

    #[test]
    fn test_severity_then_occurrences() {
        let ranked = order(vec![
            issue("warn", &["u1"], Level::Warning, 9),
            issue("err-few", &["u1"], Level::Error, 2),
            issue("err-many", &["u1"], Level::Error, 5),
            issue("crit", &["u1"], Level::Critical, 1),
        ]);
        assert_eq!(ranked, vec!["crit", "err-many", "err-few", "warn"]);
    }

    #[test]
    fn test_information_after_warning() {
        let ranked = order(vec![
            issue("info", &["u1"], Level::Information, 1),
            issue("verbose", &["u1"], Level::Verbose, 1),
            issue("warn", &["u1"], Level::Warning, 1),
        ]);
        assert_eq!(ranked, vec!["warn", "info", "verbose"]);
    }

    #[test]
    fn test_ranking_independent_of_input_order() {
        let make = || {
            vec![
                issue("x", &["u1", "u2"], Level::Error, 3),
                issue("y", &["u1", "u2"], Level::Error, 3),
                issue("z", &["u1"], Level::Critical, 10),
            ]
        };
        let mut reversed = make();
        reversed.reverse();
        assert_eq!(order(make()), order(reversed));
    }
}
