//! Categorization rule table.
//!
//! Rules are plain data evaluated in order; the first match wins, so more
//! specific rules sit ahead of generic ones.

use std::sync::LazyLock;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::conf::RuleConfig;
use crate::model::{Event, Level};

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid pattern for rule '{category}': {source}")]
    InvalidPattern {
        category: String,
        #[source]
        source: regex::Error,
    },
}

/// Keyword hits required for a keyword match
const MIN_KEYWORD_HITS: usize = 2;

/// Which check of a rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Pattern,
    MessageKeywords,
    EventId,
    SourceKeywords,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub category: String,
    /// Pattern text as written; also searched for `event id <N>` mentions
    pub pattern: String,
    regex: Regex,
    /// `None` keeps the representative event's own level
    pub severity: Option<Level>,
    pub keywords: Vec<String>,
    pub root_cause: String,
    pub solution: String,
}

impl Rule {
    pub fn new(
        category: &str,
        pattern: &str,
        severity: Option<Level>,
        keywords: &[&str],
        root_cause: &str,
        solution: &str,
    ) -> Result<Self, RuleError> {
        let regex = Regex::new(&format!("(?i){}", pattern)).map_err(|source| RuleError::InvalidPattern {
            category: category.to_string(),
            source,
        })?;

        Ok(Self {
            category: category.to_string(),
            pattern: pattern.to_string(),
            regex,
            severity,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            root_cause: root_cause.to_string(),
            solution: solution.to_string(),
        })
    }

    pub fn from_config(config: &RuleConfig) -> Result<Self, RuleError> {
        let keywords: Vec<&str> = config.keywords.iter().map(String::as_str).collect();
        Self::new(
            &config.category,
            &config.pattern,
            config.severity,
            &keywords,
            &config.root_cause,
            &config.solution,
        )
    }

    /// Checks in order: pattern on the message, two keywords in the message,
    /// the event id named in the pattern, two keywords in source or log type.
    pub fn matches(&self, event: &Event) -> Option<MatchKind> {
        let message = event.message.to_lowercase();

        if self.regex.is_match(&message) {
            return Some(MatchKind::Pattern);
        }

        if self.keyword_hits(|kw| message.contains(kw)) >= MIN_KEYWORD_HITS {
            return Some(MatchKind::MessageKeywords);
        }

        if self.names_event_id(event.event_id) {
            return Some(MatchKind::EventId);
        }

        let source = event.source.to_lowercase();
        let log_type = event.log_type.to_lowercase();
        if self.keyword_hits(|kw| source.contains(kw) || log_type.contains(kw)) >= MIN_KEYWORD_HITS {
            return Some(MatchKind::SourceKeywords);
        }

        None
    }

    fn keyword_hits<F: Fn(&str) -> bool>(&self, hit: F) -> usize {
        self.keywords.iter().filter(|kw| hit(kw)).count()
    }

    /// Plain substring test: `event id 5` is named by a pattern that
    /// mentions `event id 507`.
    fn names_event_id(&self, event_id: u32) -> bool {
        self.pattern.contains(&format!("event id {}", event_id))
    }
}

/// Ordered rule list: custom rules first, then the built-in table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
        }
    }

    /// Invalid custom rules are logged and dropped.
    pub fn with_custom(custom: &[RuleConfig]) -> Self {
        let mut rules: Vec<Rule> = custom
            .iter()
            .filter_map(|config| match Rule::from_config(config) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    warn!("Dropping custom rule: {}", e);
                    None
                }
            })
            .collect();
        rules.extend(BUILTIN_RULES.iter().cloned());
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First matching rule.
    pub fn find(&self, event: &Event) -> Option<(&Rule, MatchKind)> {
        self.rules
            .iter()
            .find_map(|rule| rule.matches(event).map(|kind| (rule, kind)))
    }
}

struct RuleSpec {
    category: &'static str,
    pattern: &'static str,
    severity: Level,
    keywords: &'static [&'static str],
    root_cause: &'static str,
    solution: &'static str,
}

static BUILTIN_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    BUILTIN
        .iter()
        .map(|spec| {
            Rule::new(
                spec.category,
                spec.pattern,
                Some(spec.severity),
                spec.keywords,
                spec.root_cause,
                spec.solution,
            )
            .expect("valid builtin rule")
        })
        .collect()
});

const BUILTIN: &[RuleSpec] = &[
    // Network connectivity
    RuleSpec {
        category: "Network Connectivity",
        pattern: r"event id 4042|ncsi|capability.*change|media disconnect",
        severity: Level::Error,
        keywords: &["network", "ncsi", "connectivity", "capability", "media disconnect"],
        root_cause: "Network capability changed or media disconnection detected. This indicates the device lost connectivity, possibly due to wireless signal issues, network adapter problems, or media disconnect events.",
        solution: "Check network adapter status in Device Manager, update network drivers, verify WiFi signal strength, restart network adapter or check physical network connection",
    },
    RuleSpec {
        category: "Network Connectivity",
        pattern: r"event id 4006|no.*network.*connectivity|connectivity.*lost",
        severity: Level::Critical,
        keywords: &["network", "no connectivity", "disconnected", "internet"],
        root_cause: "Network connectivity completely lost. NCSI (Network Connectivity Status Indicator) detected no network access, indicating either no physical connection or complete network isolation.",
        solution: "Verify physical network connection, check network adapter hardware, restart network adapter, run network troubleshooter, verify network configuration and IP settings",
    },
    RuleSpec {
        category: "Network Connectivity",
        pattern: r"event id 4005|local.*network.*only|limited.*network",
        severity: Level::Warning,
        keywords: &["local network", "limited connectivity", "no internet"],
        root_cause: "Device has local network connectivity but no internet access. DNS probes are failing or the gateway is unreachable, preventing internet connectivity.",
        solution: "Check DNS settings (try 8.8.8.8 or 1.1.1.1), verify gateway is reachable, check ISP connection, test DNS resolution with nslookup, restart modem/router",
    },
    RuleSpec {
        category: "Network Connectivity",
        pattern: r"event id 4003|captive portal|hotspot.*detected",
        severity: Level::Warning,
        keywords: &["captive portal", "hotspot", "authentication required"],
        root_cause: "Device detected a captive portal network (like hotel WiFi, airport WiFi, or public hotspot) requiring authentication. HTTP probe failed due to redirection to login page.",
        solution: "Open web browser to authenticate with captive portal, accept terms of service, verify WiFi SSID is correct, check for proxy requirements",
    },
    RuleSpec {
        category: "Network Connectivity",
        pattern: r"event id 507|exit.*standby|wake.*sleep|resume.*hibernation",
        severity: Level::Warning,
        keywords: &["wake from standby", "resume", "sleep", "connected standby"],
        root_cause: "Device waking from sleep/standby. Network connectivity may be temporarily unavailable during resume as network adapters reinitialize.",
        solution: "Wait 10-15 seconds for network adapter to reinitialize after wake, check network adapter power management settings, disable selective suspend for network adapter in Power Options",
    },
    RuleSpec {
        category: "Network Connectivity",
        pattern: r"event id 8002|wlan.*autoconnect.*fail|wireless.*connect.*fail",
        severity: Level::Error,
        keywords: &["wlan", "autoconnect", "wireless", "wifi", "connection fail"],
        root_cause: "Wireless auto-connect failed. The device attempted to automatically connect to a configured WiFi network but the connection failed, possibly due to authentication, network unavailability, or profile issues.",
        solution: "Verify WiFi network is broadcasting SSID, check WiFi password, remove and re-add WiFi profile, update wireless adapter driver, restart WiFi adapter",
    },
    RuleSpec {
        category: "Network Connectivity",
        pattern: r"event id 11006|wlan.*security.*fail|wifi.*authentication.*fail|security.*error",
        severity: Level::Error,
        keywords: &["wlan security", "authentication", "wifi password", "802.1x", "eap"],
        root_cause: "WiFi security authentication failed. The device failed to establish a secure connection to the WiFi network due to incorrect credentials, security protocol mismatch, certificate issues, or 802.1X/EAP failures.",
        solution: "Verify WiFi password is correct, check security type matches network settings (WPA2 vs WPA3), update wireless driver, remove expired certificates, check RADIUS server if using 802.1X",
    },
    RuleSpec {
        category: "Network Connectivity",
        pattern: r"dns.*fail|dns.*resolv|activehttp.*probe.*fail",
        severity: Level::Error,
        keywords: &["dns", "resolution", "probe failed", "msftconnecttest"],
        root_cause: "DNS resolution failed or HTTP connectivity probe failed. Network connectivity tests are unable to reach internet services, indicating DNS issues or network path problems.",
        solution: "Test DNS resolution (nslookup google.com), change DNS servers to 8.8.8.8 or 1.1.1.1, flush DNS cache (ipconfig /flushdns), check proxy settings, verify firewall allows DNS/HTTP",
    },
    RuleSpec {
        category: "Network Connectivity",
        pattern: r"arp.*fail|gateway.*unreachable|l2.*reachability",
        severity: Level::Error,
        keywords: &["arp", "gateway", "layer 2", "reachability", "duplicate ip"],
        root_cause: "Layer 2 (ARP) probe failed indicating reachability issues with gateway or next hop. This suggests WiFi instability, duplicate IP addresses, or network infrastructure problems.",
        solution: "Check WiFi signal strength and roaming, release and renew IP address (ipconfig /release /renew), check for duplicate IP addresses on network, restart WiFi router, check for WiFi interference",
    },
    // General system
    RuleSpec {
        category: "Service Management",
        pattern: r"start type.*service.*changed",
        severity: Level::Warning,
        keywords: &["service", "start type", "changed"],
        root_cause: "Windows service configuration is being frequently modified, possibly by system updates or third-party software",
        solution: "Review service dependencies and check for conflicting software that may be changing service configurations",
    },
    RuleSpec {
        category: "Disk Issues",
        pattern: r"disk.*error|bad.*sector|read.*fail|write.*fail",
        severity: Level::Critical,
        keywords: &["disk", "error", "bad", "sector", "read fail", "write fail"],
        root_cause: "Hard disk showing signs of failure or file system corruption",
        solution: "Run CHKDSK utility, backup critical data immediately, consider disk replacement if errors persist",
    },
    RuleSpec {
        category: "Application Crash",
        pattern: r"application.*crash|application.*fault|exception.*0x",
        severity: Level::Error,
        keywords: &["crash", "fault", "exception", "terminated unexpectedly"],
        root_cause: "Application encountering unhandled exceptions or memory access violations",
        solution: "Update application to latest version, check for compatibility issues, review application logs for specific error codes",
    },
    RuleSpec {
        category: "Driver Issues",
        pattern: r"driver.*fail|driver.*not.*load|device.*not.*start",
        severity: Level::Error,
        keywords: &["driver", "fail", "not load", "device", "not start"],
        root_cause: "Device driver incompatibility or corruption preventing proper device initialization",
        solution: "Update or reinstall device drivers, check Device Manager for conflicts, verify driver digital signature",
    },
    RuleSpec {
        category: "Memory Issues",
        pattern: r"out of memory|memory.*corrupt|page fault|insufficient.*memory",
        severity: Level::Critical,
        keywords: &["out of memory", "memory corrupt", "page fault", "insufficient memory"],
        root_cause: "System running low on available memory or experiencing memory corruption",
        solution: "Close unnecessary applications, add more RAM, run Windows Memory Diagnostic tool, check for memory leaks",
    },
    RuleSpec {
        category: "Security/Authentication",
        pattern: r"login.*fail|authentication.*fail|access.*denied|credential.*invalid",
        severity: Level::Warning,
        keywords: &["login fail", "authentication fail", "access denied", "credential invalid"],
        root_cause: "User authentication failures or permission issues",
        solution: "Verify user credentials, check account lockout policies, review access permissions, reset password if needed",
    },
    RuleSpec {
        category: "System Performance",
        pattern: r"timeout|response.*slow|high.*cpu|performance.*degrad",
        severity: Level::Warning,
        keywords: &["timeout", "slow", "high cpu", "performance", "degrad"],
        root_cause: "System experiencing performance bottlenecks or resource exhaustion",
        solution: "Check Task Manager for resource usage, disable startup programs, scan for malware, optimize system settings",
    },
    RuleSpec {
        category: "Windows Update",
        pattern: r"update.*fail|installation.*fail|windows update",
        severity: Level::Warning,
        keywords: &["update fail", "installation fail", "windows update"],
        root_cause: "Windows Update service experiencing issues or insufficient disk space",
        solution: "Run Windows Update Troubleshooter, clear Software Distribution folder, ensure sufficient disk space",
    },
    RuleSpec {
        category: "Event Description Missing",
        pattern: r"description.*Event ID.*could not be found",
        severity: Level::Information,
        keywords: &["description", "could not be found"],
        root_cause: "Event message DLL not registered or missing for the event source",
        solution: "This is typically informational and doesn't indicate a problem. The event data is still recorded.",
    },
];
