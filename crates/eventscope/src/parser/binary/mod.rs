//! Binary event-log decoding.
//!
//! Tiers are tried in order; the first one that is available and yields at
//! least one record wins. A failing tier is logged and the next one tried.

pub mod capability;
pub mod encoding;
pub mod markup;
pub mod native;
pub mod scan;
pub mod structured;

use std::path::Path;
use tracing::{debug, trace, warn};

pub use capability::DecoderCapabilities;
use native::NativeTier;
use scan::HeuristicTier;
use structured::StructuredTier;

use super::traits::{DecodeTier, RecordFields, TierKind};

/// Result of decoding one binary file.
#[derive(Debug, Default)]
pub struct BinaryOutcome {
    pub records: Vec<RecordFields>,
    pub skipped: usize,
    /// Tier that produced `records`, `None` when every tier came up empty
    pub tier: Option<TierKind>,
}

pub struct BinaryLogParser {
    tiers: Vec<Box<dyn DecodeTier>>,
}

impl BinaryLogParser {
    pub fn new(capabilities: DecoderCapabilities) -> Self {
        Self {
            // Order matters! Highest fidelity first
            tiers: vec![
                Box::new(StructuredTier::new(capabilities.structured)),
                Box::new(NativeTier::new(capabilities.native)),
                Box::new(HeuristicTier::default()),
            ],
        }
    }

    pub fn with_tiers(tiers: Vec<Box<dyn DecodeTier>>) -> Self {
        Self { tiers }
    }

    pub fn tier_kinds(&self) -> Vec<TierKind> {
        self.tiers.iter().map(|t| t.kind()).collect()
    }

    pub fn available_tiers(&self) -> Vec<TierKind> {
        self.tiers
            .iter()
            .filter(|t| t.is_available())
            .map(|t| t.kind())
            .collect()
    }

    pub fn decode(&self, path: &Path, log_type: &str) -> BinaryOutcome {
        let mut skipped = 0;

        for tier in &self.tiers {
            let kind = tier.kind();
            if !tier.is_available() {
                trace!(tier = kind.as_str(), "Tier unavailable");
                continue;
            }

            match tier.decode(path, log_type) {
                Ok(output) if !output.records.is_empty() => {
                    debug!(
                        tier = kind.as_str(),
                        path = %path.display(),
                        records = output.records.len(),
                        "Decoded binary log"
                    );
                    return BinaryOutcome {
                        records: output.records,
                        skipped: skipped + output.skipped,
                        tier: Some(kind),
                    };
                }
                Ok(output) => {
                    debug!(tier = kind.as_str(), path = %path.display(), "Tier produced no records");
                    skipped += output.skipped;
                }
                Err(e) => {
                    warn!(tier = kind.as_str(), path = %path.display(), "Decoding tier failed: {}", e);
                }
            }
        }

        BinaryOutcome {
            records: Vec::new(),
            skipped,
            tier: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::native::fake::{record, FakeEventLog};
    use crate::parser::traits::{DecodeError, TierOutput};

    /// Scripted tier: fixed availability and result, counts calls.
    struct ScriptedTier {
        kind: TierKind,
        available: bool,
        records: usize,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedTier {
        fn boxed(kind: TierKind, available: bool, records: usize, fail: bool) -> (Box<dyn DecodeTier>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let tier = ScriptedTier { kind, available, records, fail, calls: calls.clone() };
            (Box::new(tier), calls)
        }
    }

    impl DecodeTier for ScriptedTier {
        fn kind(&self) -> TierKind {
            self.kind
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn decode(&self, _path: &Path, _log_type: &str) -> Result<TierOutput, DecodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DecodeError::Structured("corrupt".to_string()));
            }
            let records = (0..self.records)
                .map(|i| markup::scanned_record(i as u64, "", None))
                .collect();
            Ok(TierOutput { records, skipped: 0 })
        }
    }

    #[test]
    fn test_default_tier_order() {
        let parser = BinaryLogParser::new(DecoderCapabilities::heuristic_only());
        assert_eq!(
            parser.tier_kinds(),
            vec![TierKind::Structured, TierKind::Native, TierKind::Heuristic]
        );
        assert_eq!(parser.available_tiers(), vec![TierKind::Heuristic]);
    }

    #[test]
    fn test_first_productive_tier_wins() {
        let (first, first_calls) = ScriptedTier::boxed(TierKind::Structured, true, 3, false);
        let (second, second_calls) = ScriptedTier::boxed(TierKind::Heuristic, true, 5, false);
        let parser = BinaryLogParser::with_tiers(vec![first, second]);

        let outcome = parser.decode(Path::new("System.evtx"), "System");
        assert_eq!(outcome.tier, Some(TierKind::Structured));
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unavailable_tier_never_called() {
        let (first, first_calls) = ScriptedTier::boxed(TierKind::Structured, false, 3, false);
        let (second, _) = ScriptedTier::boxed(TierKind::Heuristic, true, 1, false);
        let parser = BinaryLogParser::with_tiers(vec![first, second]);

        let outcome = parser.decode(Path::new("System.evtx"), "System");
        assert_eq!(outcome.tier, Some(TierKind::Heuristic));
        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failing_and_empty_tiers_fall_through() {
        let (failing, _) = ScriptedTier::boxed(TierKind::Structured, true, 0, true);
        let (empty, _) = ScriptedTier::boxed(TierKind::Native, true, 0, false);
        let (last, _) = ScriptedTier::boxed(TierKind::Heuristic, true, 2, false);
        let parser = BinaryLogParser::with_tiers(vec![failing, empty, last]);

        let outcome = parser.decode(Path::new("System.evtx"), "System");
        assert_eq!(outcome.tier, Some(TierKind::Heuristic));
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn test_all_tiers_exhausted() {
        let (failing, _) = ScriptedTier::boxed(TierKind::Structured, true, 0, true);
        let (empty, _) = ScriptedTier::boxed(TierKind::Heuristic, true, 0, false);
        let parser = BinaryLogParser::with_tiers(vec![failing, empty]);

        let outcome = parser.decode(Path::new("System.evtx"), "System");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.tier, None);
    }

    #[test]
    fn test_native_tier_used_when_structured_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a real event log").unwrap();

        let log = Arc::new(FakeEventLog::default().with_channel("System", vec![record("Tcpip", 4227, 2)]));
        let caps = DecoderCapabilities::heuristic_only()
            .with_structured(true)
            .with_native(log);
        let outcome = BinaryLogParser::new(caps).decode(file.path(), "Network");

        assert_eq!(outcome.tier, Some(TierKind::Native));
        assert_eq!(outcome.records[0].source, "Tcpip");
    }

    #[test]
    fn test_markerless_file_yields_nothing_without_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x45, 0x6c, 0x66, 0x00, 0x13, 0x37, 0x00, 0x00, 0xff, 0xfe]).unwrap();

        let parser = BinaryLogParser::new(DecoderCapabilities::heuristic_only());
        let outcome = parser.decode(file.path(), "System");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.tier, None);
    }
}
