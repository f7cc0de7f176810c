//! Model: AnalyzerConfig and related structs.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Level;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which files a session directory is scanned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisScope {
    /// Only files whose names carry a domain keyword (or configured names)
    #[default]
    Network,
    /// Any file with a whitelisted extension
    All,
}

impl AnalysisScope {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "network" => Some(AnalysisScope::Network),
            "all" => Some(AnalysisScope::All),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub logs_dir: PathBuf,
    /// Known log file names, always accepted during discovery
    pub log_types: Vec<String>,
    pub scope: AnalysisScope,
    pub discovery: DiscoveryConfig,
    pub detection: DetectionConfig,
    pub binary: BinaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub domain_keywords: Vec<String>,
    /// Extensions (without the dot) eligible for keyword acceptance
    pub extensions: Vec<String>,
    /// File stems ending in one of these are never parsed
    pub rejected_suffixes: Vec<String>,
    /// Regex identifying the host segment of a session path
    pub host_prefix_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Issues affecting fewer unique owners are dropped
    pub min_affected_owners: usize,
    pub fingerprint_includes_level: bool,
    /// Evaluated ahead of the built-in rule table
    pub custom_rules: Vec<RuleConfig>,
}

/// A user-supplied categorization rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub category: String,
    pub pattern: String,
    #[serde(default)]
    pub severity: Option<Level>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub root_cause: String,
    pub solution: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryConfig {
    pub structured_decoder: bool,
    /// Only has an effect on platforms exposing an event-log API
    pub native_api: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from("analysis_logs"),
            log_types: [
                "Network.log",
                "network_logs.txt",
                "network_dhcp.log",
                "network_dns.log",
                "network_firewall.log",
                "network_ncsi.log",
                "network_networkprofile.log",
                "network_other.log",
                "network_tcpip.log",
                "network_wlan.log",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            scope: AnalysisScope::Network,
            discovery: DiscoveryConfig::default(),
            detection: DetectionConfig::default(),
            binary: BinaryConfig::default(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            domain_keywords: [
                "network", "ncsi", "wlan", "dns", "dhcp", "tcpip", "firewall", "nla", "connectivity",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            extensions: ["log", "txt", "evtx"].iter().map(|s| s.to_string()).collect(),
            rejected_suffixes: ["index", "summary"].iter().map(|s| s.to_string()).collect(),
            host_prefix_pattern: "(?i)^soc-".to_string(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_affected_owners: 1,
            fingerprint_includes_level: true,
            custom_rules: Vec::new(),
        }
    }
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            structured_decoder: true,
            native_api: true,
        }
    }
}

impl AnalyzerConfig {
    /// Validate configuration values (no I/O)
    pub fn validate(&self) -> Result<(), String> {
        if self.log_types.iter().any(|name| name.trim().is_empty()) {
            return Err("log_types must not contain empty names".to_string());
        }
        if self.detection.min_affected_owners == 0 {
            return Err("detection.min_affected_owners must be > 0".to_string());
        }
        self.discovery.validate()
    }
}

impl DiscoveryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.extensions.is_empty() {
            return Err("discovery.extensions must not be empty".to_string());
        }
        if let Err(e) = regex::Regex::new(&self.host_prefix_pattern) {
            return Err(format!("discovery.host_prefix_pattern is not a valid regex: {}", e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ─────────────────────────────────────────────────

    #[test]
    fn test_default_log_types() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.log_types.len(), 10);
        assert!(cfg.log_types.contains(&"Network.log".to_string()));
        assert!(cfg.log_types.contains(&"network_wlan.log".to_string()));
    }

    #[test]
    fn test_default_scope_is_network() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.scope, AnalysisScope::Network);
    }

    #[test]
    fn test_default_detection() {
        let det = DetectionConfig::default();
        assert_eq!(det.min_affected_owners, 1);
        assert!(det.fingerprint_includes_level);
        assert!(det.custom_rules.is_empty());
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!(AnalysisScope::parse("ALL"), Some(AnalysisScope::All));
        assert_eq!(AnalysisScope::parse("network"), Some(AnalysisScope::Network));
        assert_eq!(AnalysisScope::parse("everything"), None);
    }

    // ── Validation ───────────────────────────────────────────────

    #[test]
    fn test_validate_default_passes() {
        assert!(AnalyzerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_owner_threshold() {
        let mut cfg = AnalyzerConfig::default();
        cfg.detection.min_affected_owners = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("min_affected_owners"), "Error should mention min_affected_owners: {}", err);
    }

    #[test]
    fn test_validate_rejects_bad_host_pattern() {
        let mut cfg = AnalyzerConfig::default();
        cfg.discovery.host_prefix_pattern = "(unclosed".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("host_prefix_pattern"), "Error should mention host_prefix_pattern: {}", err);
    }

    #[test]
    fn test_validate_rejects_empty_extensions() {
        let mut cfg = AnalyzerConfig::default();
        cfg.discovery.extensions.clear();
        assert!(cfg.validate().is_err());
    }

    // ── Deserialization ──────────────────────────────────────────

    #[test]
    fn test_deserialize_partial_toml() {
        let toml_str = r#"
            logs_dir = "/var/log/fleet"
            scope = "all"
        "#;
        let cfg: AnalyzerConfig = toml::from_str(toml_str).expect("Should accept partial TOML");
        assert_eq!(cfg.logs_dir, PathBuf::from("/var/log/fleet"));
        assert_eq!(cfg.scope, AnalysisScope::All);
        assert_eq!(cfg.log_types.len(), 10); // default
        assert!(cfg.binary.structured_decoder); // default
    }

    #[test]
    fn test_deserialize_custom_rules() {
        let toml_str = r#"
            [[detection.custom_rules]]
            category = "VPN"
            pattern = "vpn.*tunnel.*down"
            severity = "Critical"
            keywords = ["vpn", "tunnel"]
            root_cause = "Tunnel dropped"
            solution = "Reconnect the VPN client"
        "#;
        let cfg: AnalyzerConfig = toml::from_str(toml_str).expect("Should parse custom rules");
        let rule = cfg.detection.custom_rules.first().expect("rule should exist");
        assert_eq!(rule.category, "VPN");
        assert_eq!(rule.severity, Some(Level::Critical));
        assert_eq!(rule.keywords, vec!["vpn".to_string(), "tunnel".to_string()]);
    }
}
