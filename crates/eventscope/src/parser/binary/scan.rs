//! Heuristic byte scan: decode the raw file as text and look for embedded
//! markup. Always available.

use std::path::Path;
use tracing::trace;

use super::encoding::{decode_first, TextEncoding, SCAN_ORDER};
use super::markup::{self, EVENT_BOUNDARY, TIME_MARKER};
use crate::parser::traits::{DecodeError, DecodeTier, TierKind, TierOutput};

/// Characters of context taken on each side of a time marker
pub const CONTEXT_RADIUS: usize = 1000;

pub struct HeuristicTier {
    encodings: Vec<TextEncoding>,
}

impl Default for HeuristicTier {
    fn default() -> Self {
        Self {
            encodings: SCAN_ORDER.to_vec(),
        }
    }
}

impl HeuristicTier {
    pub fn with_encodings(encodings: Vec<TextEncoding>) -> Self {
        Self { encodings }
    }

    pub fn scan_bytes(&self, bytes: &[u8]) -> TierOutput {
        match decode_first(&self.encodings, bytes) {
            Some((encoding, text)) => {
                trace!(encoding = encoding.name(), chars = text.len(), "Decoded binary log for scanning");
                scan_text(&text)
            }
            None => TierOutput::default(),
        }
    }
}

impl DecodeTier for HeuristicTier {
    fn kind(&self) -> TierKind {
        TierKind::Heuristic
    }

    fn is_available(&self) -> bool {
        true
    }

    fn decode(&self, path: &Path, _log_type: &str) -> Result<TierOutput, DecodeError> {
        let bytes = std::fs::read(path)?;
        Ok(self.scan_bytes(&bytes))
    }
}

/// One record per time marker; without markers, one per `<Event>` span.
pub fn scan_text(text: &str) -> TierOutput {
    let markers: Vec<(usize, usize, &str)> = TIME_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let raw = caps.get(1).or_else(|| caps.get(2))?;
            Some((whole.start(), whole.end(), raw.as_str()))
        })
        .collect();

    let records = if markers.is_empty() {
        EVENT_BOUNDARY
            .find_iter(text)
            .enumerate()
            .map(|(i, span)| {
                let context = span.as_str();
                markup::scanned_record(i as u64 + 1, context, markup::system_time(context))
            })
            .collect()
    } else {
        markers
            .iter()
            .enumerate()
            .map(|(i, &(start, end, raw))| {
                let context = window(text, start, end, CONTEXT_RADIUS);
                markup::scanned_record(i as u64 + 1, context, Some(raw))
            })
            .collect()
    };

    TierOutput { records, skipped: 0 }
}

/// `text[start..end]` widened by `radius` characters on each side.
fn window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = match radius {
        0 => start,
        _ => text[..start]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map(|(i, _)| i)
            .unwrap_or(0),
    };
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Level;
    use crate::parser::binary::encoding::utf16le;
    use crate::parser::binary::markup::fixtures::event_xml;

    fn container(records: &[String]) -> Vec<u8> {
        // Binary noise around each wide-encoded record
        let mut bytes = b"ElfFile\0\x03\0\0\0".to_vec();
        for record in records {
            bytes.extend_from_slice(&[0u8; 16]);
            bytes.extend_from_slice(&utf16le(record));
        }
        bytes
    }

    #[test]
    fn test_scan_finds_records_by_time_marker() {
        let first = event_xml(4042, 2, "Microsoft-Windows-NCSI", "2026-01-26T12:13:30.000Z", &[("A", "one")]);
        let second = event_xml(8002, 3, "Microsoft-Windows-WLAN-AutoConfig", "2026-01-26T12:20:00.000Z", &[("B", "two")]);
        let padding = "p".repeat(2500);
        let bytes = container(&[first, padding, second]);

        let output = HeuristicTier::default().scan_bytes(&bytes);
        assert_eq!(output.records.len(), 2);

        let a = &output.records[0];
        assert_eq!(a.sequence, 1);
        assert_eq!(a.event_id, 4042);
        assert_eq!(a.level, Level::Error);
        assert_eq!(a.source, "Microsoft-Windows-NCSI");
        assert!(!a.timestamp_estimated);
        assert_eq!(a.message, "one");

        let b = &output.records[1];
        assert_eq!(b.event_id, 8002);
        assert_eq!(b.level, Level::Warning);
    }

    #[test]
    fn test_scan_boundary_fallback() {
        let text = "<Event><System><EventID>41</EventID><Level>1</Level></System></Event>\
                    junk\
                    <Event><System><EventID>6008</EventID></System><EventData><Data>x</Data></EventData></Event>";
        let output = scan_text(text);
        assert_eq!(output.records.len(), 2);
        assert_eq!(output.records[0].event_id, 41);
        assert_eq!(output.records[0].level, Level::Critical);
        assert!(output.records[0].timestamp_estimated);
        assert_eq!(output.records[0].message, "Event data available");
        assert_eq!(output.records[1].message, "x");
    }

    #[test]
    fn test_scan_without_markers_is_empty() {
        let bytes: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
        let output = HeuristicTier::default().scan_bytes(&bytes);
        assert!(output.records.is_empty());
    }

    #[test]
    fn test_custom_encoding_order() {
        let xml = event_xml(1014, 3, "Microsoft-Windows-DNS-Client", "2026-01-26T12:13:30Z", &[]);

        // Wide decoding of narrow bytes never yields ASCII markup
        assert!(HeuristicTier::default().scan_bytes(xml.as_bytes()).records.is_empty());

        let output = HeuristicTier::with_encodings(vec![TextEncoding::Utf8]).scan_bytes(xml.as_bytes());
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].event_id, 1014);
    }

    #[test]
    fn test_partial_record_keeps_defaults() {
        let output = scan_text("garbage <SystemTime>2026-01-26T12:13:30Z</SystemTime> garbage");
        assert_eq!(output.records.len(), 1);
        let record = &output.records[0];
        assert_eq!(record.event_id, 0);
        assert_eq!(record.source, "Unknown");
        assert_eq!(record.level, Level::Information);
        assert!(!record.timestamp_estimated);
    }

    #[test]
    fn test_window_is_char_bounded() {
        let text = format!("{}[marker]{}", "é".repeat(5), "ü".repeat(5));
        let start = text.find('[').unwrap();
        let end = text.find(']').unwrap() + 1;
        assert_eq!(window(&text, start, end, 2), "éé[marker]üü");
        assert_eq!(window(&text, start, end, 50), text);
    }
}
