//! Parser module: turns one log file into normalized events.
//!
//! Files with the binary event-log extension go through the tiered
//! [`BinaryLogParser`]; everything else is read as text by [`TextLogParser`].

pub mod binary;
pub mod metrics;
pub mod model;
pub mod text;
pub mod timestamp;
pub mod traits;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub use binary::{BinaryLogParser, DecoderCapabilities};
pub use metrics::{IngestMetrics, MetricsSnapshot};
pub use model::{DecodeError, FileContext, ParseError, RecordFields};
pub use text::TextLogParser;

use crate::model::Event;

pub const BINARY_EXTENSION: &str = "evtx";

pub fn is_binary_log(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BINARY_EXTENSION))
}

pub struct LogParser {
    text: TextLogParser,
    binary: BinaryLogParser,
    metrics: Arc<IngestMetrics>,
}

impl LogParser {
    pub fn new(capabilities: DecoderCapabilities) -> Self {
        Self::with_metrics(capabilities, Arc::new(IngestMetrics::new()))
    }

    pub fn with_metrics(capabilities: DecoderCapabilities, metrics: Arc<IngestMetrics>) -> Self {
        Self {
            text: TextLogParser::new(),
            binary: BinaryLogParser::new(capabilities),
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<IngestMetrics> {
        &self.metrics
    }

    /// Parse one file. Unreadable files and undecodable binaries yield no events.
    pub fn parse_file(&self, path: &Path, owner: &str, host: &str, session: &str) -> Vec<Event> {
        let ctx = FileContext::new(path, owner, host, session);
        let started = Instant::now();
        let binary = is_binary_log(path);

        let (records, skipped) = if binary {
            let outcome = self.binary.decode(path, &ctx.log_type);
            self.metrics.record_tier(outcome.tier);
            (outcome.records, outcome.skipped)
        } else {
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %path.display(), "Failed to read log file: {}", e);
                    self.metrics.record_failed_file();
                    return Vec::new();
                }
            };
            let outcome = self.text.parse_bytes(&bytes);
            debug!(path = %path.display(), format = ?outcome.format, records = outcome.records.len(), "Parsed text log");
            (outcome.records, outcome.skipped)
        };

        let events: Vec<Event> = records.into_iter().map(|fields| ctx.event(fields)).collect();
        let estimated = events.iter().filter(|e| e.timestamp_estimated).count();

        self.metrics.record_file(
            binary,
            events.len() as u64,
            skipped as u64,
            estimated as u64,
            started.elapsed().as_nanos() as u64,
        );
        events
    }
}
