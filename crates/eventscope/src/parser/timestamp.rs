//! Timestamp normalization.
//!
//! Parsing never fails: when no known format matches, the current local time
//! is substituted and the result is flagged as estimated.

use chrono::{DateTime, Local, NaiveDateTime};

/// Text-log formats, tried in order.
pub const TEXT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Prefix formats for event-log markup times, applied to the first 19 characters.
const MARKUP_PREFIX_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    pub value: NaiveDateTime,
    /// True when `value` is a "now" substitute
    pub estimated: bool,
}

impl ParsedTimestamp {
    pub fn exact(value: NaiveDateTime) -> Self {
        Self { value, estimated: false }
    }

    pub fn now() -> Self {
        Self {
            value: Local::now().naive_local(),
            estimated: true,
        }
    }
}

/// Parse a timestamp taken from a text log.
pub fn normalize(raw: &str) -> ParsedTimestamp {
    let raw = raw.trim();
    TEXT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(ParsedTimestamp::exact)
        .unwrap_or_else(|| {
            tracing::trace!(raw, "Unrecognized timestamp, substituting now");
            ParsedTimestamp::now()
        })
}

/// Parse an ISO-8601 `SystemTime` value from event-log markup
/// (e.g. `2024-01-15T10:30:45.123456Z`). Offsets are converted to UTC.
pub fn parse_system_time(raw: &str) -> ParsedTimestamp {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return ParsedTimestamp::exact(dt.naive_utc());
    }

    if let Some(prefix) = raw.get(..19) {
        if let Some(value) = MARKUP_PREFIX_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(prefix, fmt).ok())
        {
            return ParsedTimestamp::exact(value);
        }
    }

    tracing::trace!(raw, "Unrecognized SystemTime, substituting now");
    ParsedTimestamp::now()
}
