use std::path::Path;
use evtx::EvtxParser;
use tracing::debug;

use super::markup;
use crate::parser::traits::{DecodeError, DecodeTier, TierKind, TierOutput};

/// Full-fidelity decoding through the file's own record index.
pub struct StructuredTier {
    enabled: bool,
}

impl StructuredTier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl DecodeTier for StructuredTier {
    fn kind(&self) -> TierKind {
        TierKind::Structured
    }

    fn is_available(&self) -> bool {
        self.enabled
    }

    fn decode(&self, path: &Path, _log_type: &str) -> Result<TierOutput, DecodeError> {
        let mut parser = EvtxParser::from_path(path).map_err(|e| DecodeError::Structured(e.to_string()))?;

        let mut output = TierOutput::default();
        for (index, record) in parser.records().enumerate() {
            match record {
                Ok(record) => output.records.push(markup::structured_record(index as u64, &record.data)),
                Err(e) => {
                    output.skipped += 1;
                    debug!(path = %path.display(), record = index, "Skipping unreadable record: {}", e);
                }
            }
        }
        Ok(output)
    }
}
