//! Pipeline: discovery plus per-file parsing across every session.
//!
//! Sessions are independent, so the concurrent driver hands each one to a
//! blocking task and stitches the results back in discovery order.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::conf::{AnalyzerConfig, ConfigError};
use crate::discovery::{Session, SessionDiscoverer};
use crate::model::Event;
use crate::parser::{DecoderCapabilities, IngestMetrics, LogParser};

pub struct Pipeline {
    discoverer: SessionDiscoverer,
    parser: Arc<LogParser>,
}

impl Pipeline {
    pub fn new(config: &AnalyzerConfig, capabilities: DecoderCapabilities) -> Result<Self, ConfigError> {
        Ok(Self {
            discoverer: SessionDiscoverer::new(config)?,
            parser: Arc::new(LogParser::new(capabilities)),
        })
    }

    pub fn metrics(&self) -> &Arc<IngestMetrics> {
        self.parser.metrics()
    }

    pub fn discover(&self, root: &Path) -> Vec<Session> {
        self.discoverer.discover(root)
    }

    /// Parse every accepted file of one session, in file order.
    pub fn parse_session(&self, session: &Session) -> Vec<Event> {
        parse_session_with(&self.parser, session)
    }

    pub fn parse_all_logs(&self, root: &Path) -> Vec<Event> {
        self.discover(root)
            .iter()
            .flat_map(|session| self.parse_session(session))
            .collect()
    }

    /// Same result as [`Pipeline::parse_all_logs`], one blocking task per session.
    pub async fn parse_all_logs_concurrent(&self, root: &Path) -> Vec<Event> {
        let sessions = self.discover(root);
        self.parse_sessions_concurrent(sessions).await
    }

    pub async fn parse_sessions_concurrent(&self, sessions: Vec<Session>) -> Vec<Event> {
        let handles: Vec<_> = sessions
            .into_iter()
            .map(|session| {
                let parser = Arc::clone(&self.parser);
                let path = session.path.clone();
                let handle = tokio::task::spawn_blocking(move || parse_session_with(&parser, &session));
                (path, handle)
            })
            .collect();

        let mut events = Vec::new();
        for (path, handle) in handles {
            match handle.await {
                Ok(batch) => events.extend(batch),
                Err(e) => warn!(path = %path.display(), "Session task failed: {}", e),
            }
        }
        events
    }
}

fn parse_session_with(parser: &LogParser, session: &Session) -> Vec<Event> {
    parser.metrics().record_session();

    let mut events = Vec::new();
    for file in &session.files {
        events.extend(parser.parse_file(file, &session.owner, &session.host, &session.session));
    }

    debug!(
        path = %session.path.display(),
        files = session.files.len(),
        events = events.len(),
        "Parsed session"
    );
    events
}

/// Discover and parse everything under `root`, accepting `log_types` as
/// known file names on top of the default keyword filter.
pub fn parse_all_logs(root: &Path, log_types: &[String]) -> Vec<Event> {
    let config = AnalyzerConfig {
        log_types: log_types.to_vec(),
        ..Default::default()
    };

    match Pipeline::new(&config, DecoderCapabilities::detect(&config.binary)) {
        Ok(pipeline) => pipeline.parse_all_logs(root),
        Err(e) => {
            error!("Cannot build pipeline: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn block(number: u32, level: &str, id: u32, message: &str) -> String {
        format!(
            "Event #{number}\n\
             ----------------------------------------\n\
             Time: 2026-01-26 12:13:30\n\
             Level: {level}\n\
             Source: Microsoft-Windows-NCSI\n\
             Event ID: {id}\n\
             Category: None\n\
             Message: {message}\n\
             ========================================\n"
        )
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn tree() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        write(
            root.path(),
            "alice/soc-A/2026-01-26_12-13-30/Network.log",
            &(block(1, "Warning", 4042, "first") + &block(2, "Error", 4042, "second")),
        );
        write(root.path(), "alice/soc-A/2026-01-26_12-13-30/network_dns.log", &block(1, "Error", 1014, "dns"));
        write(root.path(), "bob/soc-B/2026-01-27_08-00-00/network_wlan.log", &block(1, "Information", 8001, "wlan"));
        write(root.path(), "bob/soc-B/2026-01-27_08-00-00/readme.md", "ignored");
        root
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(&AnalyzerConfig::default(), DecoderCapabilities::heuristic_only()).unwrap()
    }

    #[test]
    fn test_parse_all_logs_in_discovery_order() {
        let root = tree();
        let events = pipeline().parse_all_logs(root.path());

        let summary: Vec<(&str, &str, u32)> = events
            .iter()
            .map(|e| (e.owner.as_str(), e.log_type.as_str(), e.event_id))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("alice", "Network", 4042),
                ("alice", "Network", 4042),
                ("alice", "network_dns", 1014),
                ("bob", "network_wlan", 8001),
            ]
        );
    }

    #[test]
    fn test_metrics_count_sessions_and_files() {
        let root = tree();
        let pipeline = pipeline();
        pipeline.parse_all_logs(root.path());

        let snap = pipeline.metrics().snapshot();
        assert_eq!(snap.sessions, 2);
        assert_eq!(snap.text_files, 3);
        assert_eq!(snap.events, 4);
    }

    #[test]
    fn test_free_function_uses_log_types() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "carol/soc-C/2026-01-26_12-13-30/custom.txt", &block(1, "Error", 7, "x"));

        assert!(parse_all_logs(root.path(), &[]).is_empty());
        assert_eq!(parse_all_logs(root.path(), &["custom.txt".to_string()]).len(), 1);
    }

    #[test]
    fn test_empty_root() {
        let root = tempfile::tempdir().unwrap();
        assert!(pipeline().parse_all_logs(root.path()).is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let root = tree();
        let pipeline = pipeline();

        let sequential = pipeline.parse_all_logs(root.path());
        let concurrent = pipeline.parse_all_logs_concurrent(root.path()).await;
        assert_eq!(sequential, concurrent);
    }
}
