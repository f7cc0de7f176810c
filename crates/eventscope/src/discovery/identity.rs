use std::sync::LazyLock;
use regex::Regex;

pub const UNKNOWN_OWNER: &str = "unknown-owner";
pub const UNKNOWN_HOST: &str = "unknown-host";
pub const CURRENT_SESSION: &str = "current";

static SESSION_STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}$").expect("valid pattern"));

/// (owner, host, session) inferred from path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub owner: String,
    pub host: String,
    pub session: String,
}

#[derive(Debug, Clone)]
pub struct IdentityRules {
    host_pattern: Regex,
}

impl IdentityRules {
    pub fn new(host_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            host_pattern: Regex::new(host_pattern)?,
        })
    }

    /// `segments` are the directory's path components relative to the root.
    ///
    /// - owner: first segment
    /// - host: first segment matching the host pattern, else the second segment
    /// - session: last segment shaped like `YYYY-MM-DD_HH-MM-SS`, else the last segment
    pub fn infer(&self, segments: &[String]) -> Identity {
        let owner = segments.first().cloned().unwrap_or_else(|| UNKNOWN_OWNER.to_string());

        let host = segments
            .iter()
            .find(|s| self.host_pattern.is_match(s))
            .or_else(|| segments.get(1))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_HOST.to_string());

        let session = segments
            .iter()
            .rev()
            .find(|s| SESSION_STAMP.is_match(s))
            .or_else(|| segments.last())
            .cloned()
            .unwrap_or_else(|| CURRENT_SESSION.to_string());

        Identity { owner, host, session }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> IdentityRules {
        IdentityRules::new("(?i)^soc-").unwrap()
    }

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_standard_layout() {
        let id = rules().infer(&segs(&["alice", "soc-HOST1", "2026-01-26_12-13-30"]));
        assert_eq!(id.owner, "alice");
        assert_eq!(id.host, "soc-HOST1");
        assert_eq!(id.session, "2026-01-26_12-13-30");
    }

    #[test]
    fn test_host_found_anywhere() {
        let id = rules().infer(&segs(&["10669022", "exports", "SOC-5CG5233YBT", "2026-01-26_12-13-30"]));
        assert_eq!(id.host, "SOC-5CG5233YBT");
    }

    #[test]
    fn test_host_falls_back_to_second_segment() {
        let id = rules().infer(&segs(&["alice", "laptop", "run1"]));
        assert_eq!(id.host, "laptop");
        assert_eq!(id.session, "run1");
    }

    #[test]
    fn test_last_matching_session_wins() {
        let id = rules().infer(&segs(&["alice", "soc-A", "2026-01-01_00-00-00", "2026-01-02_00-00-00", "raw"]));
        assert_eq!(id.session, "2026-01-02_00-00-00");
    }

    #[test]
    fn test_single_segment() {
        let id = rules().infer(&segs(&["alice"]));
        assert_eq!(id.owner, "alice");
        assert_eq!(id.host, UNKNOWN_HOST);
        assert_eq!(id.session, "alice");
    }

    #[test]
    fn test_empty_path_sentinels() {
        let id = rules().infer(&[]);
        assert_eq!(id.owner, UNKNOWN_OWNER);
        assert_eq!(id.host, UNKNOWN_HOST);
        assert_eq!(id.session, CURRENT_SESSION);
    }

    #[test]
    fn test_session_pattern_is_strict() {
        let id = rules().infer(&segs(&["alice", "soc-A", "2026-01-26 12-13-30"]));
        assert_eq!(id.session, "2026-01-26 12-13-30");
        assert!(!SESSION_STAMP.is_match("2026-01-26_12-13-30x"));
    }
}
