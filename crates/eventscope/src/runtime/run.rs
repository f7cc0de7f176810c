//! Run: one analysis pass over the configured logs directory.

use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::conf::{AnalyzerConfig, ConfigError};
use crate::discovery::SessionStats;
use crate::issues::IssueDetector;
use crate::model::{AnalysisReport, Issue};
use crate::parser::DecoderCapabilities;
use crate::pipeline::Pipeline;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("No events found under {}", .0.display())]
    NoEvents(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Discover, parse, detect and report. Prints the ranked issues to stdout.
pub async fn run(config: AnalyzerConfig) -> Result<AnalysisReport, RunError> {
    let capabilities = DecoderCapabilities::detect(&config.binary);
    info!(?capabilities, "Binary decoder capabilities");

    let pipeline = Pipeline::new(&config, capabilities)?;

    let sessions = pipeline.discover(&config.logs_dir);
    let stats = SessionStats::from_sessions(&sessions);
    info!(
        sessions = stats.total_sessions,
        owners = stats.unique_owners,
        hosts = stats.unique_hosts,
        "Discovered sessions"
    );

    let events = pipeline.parse_sessions_concurrent(sessions).await;
    if events.is_empty() {
        warn!(root = %config.logs_dir.display(), "Nothing to analyze");
        return Err(RunError::NoEvents(config.logs_dir.clone()));
    }

    let issues = IssueDetector::new(&config.detection).detect(&events);
    let report = AnalysisReport::build(&events, issues);

    for issue in report.sorted_issues() {
        println!("{}", summary_line(&issue));
    }

    let m = pipeline.metrics().snapshot();
    info!(
        "Analysis complete: events={}, issues={}, files(text={}, binary={}, failed={}), skipped={}, estimated_ts={}, tiers(structured={}, native={}, heuristic={}, exhausted={}), avg_parse={:.2}ms",
        report.total_events,
        report.issues.len(),
        m.text_files,
        m.binary_files,
        m.failed_files,
        m.skipped_records,
        m.estimated_timestamps,
        m.structured_tier,
        m.native_tier,
        m.heuristic_tier,
        m.tiers_exhausted,
        m.avg_file_parse_ms,
    );

    Ok(report)
}

fn summary_line(issue: &Issue) -> String {
    format!(
        "[{}] {} {} | owners={} hosts={} occurrences={} | {}",
        issue.severity,
        issue.id,
        issue.category,
        issue.unique_owner_count(),
        issue.unique_host_count(),
        issue.occurrences,
        issue.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ERROR_BLOCK: &str = "\
Event #1
----------------------------------------
Time: 2026-01-26 12:13:30
Level: Error
Source: Microsoft-Windows-DNS-Client
Event ID: 1014
Category: None
Message: DNS resolution failed for corp.example
========================================
";

    fn config_for(root: &std::path::Path) -> AnalyzerConfig {
        let mut config = AnalyzerConfig {
            logs_dir: root.to_path_buf(),
            ..Default::default()
        };
        config.binary.native_api = false;
        config
    }

    #[tokio::test]
    async fn test_run_builds_report() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("alice/soc-A/2026-01-26_12-13-30");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("network_dns.log"), ERROR_BLOCK).unwrap();

        let report = run(config_for(root.path())).await.unwrap();
        assert_eq!(report.total_events, 1);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].category, "Network Connectivity");
    }

    #[tokio::test]
    async fn test_run_without_events_fails() {
        let root = tempfile::tempdir().unwrap();
        let err = run(config_for(root.path())).await.unwrap_err();
        assert!(matches!(err, RunError::NoEvents(_)));
    }
}
