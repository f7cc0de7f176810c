//! Targeted field extraction from event-log XML markup.
//!
//! Shared by the structured tier (one complete record per call) and the
//! heuristic scanner (a window of text around a marker).

use std::sync::LazyLock;
use regex::Regex;

use crate::model::Level;
use crate::parser::timestamp::{self, ParsedTimestamp};
use crate::parser::traits::RecordFields;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("valid pattern")
}

static EVENT_ID: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<EventID[^>]*>(\d+)</EventID>"));
static LEVEL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)<Level>(\d+|Critical|Error|Warning|Information|Verbose)</Level>"));
static PROVIDER: LazyLock<Regex> = LazyLock::new(|| pattern(r#"(?i)<Provider\s+[^>]*Name="([^"]+)""#));
static CHANNEL: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<Channel>([^<]+)</Channel>"));
static NAMED_DATA: LazyLock<Regex> = LazyLock::new(|| pattern(r#"(?i)<Data\s+Name="([^"]+)">([^<]*)</Data>"#));
static UNNAMED_DATA: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<Data>([^<]+)</Data>"));
static ANY_DATA: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<Data[^>]*>([^<]+)</Data>"));

/// `<SystemTime>..</SystemTime>` or `SystemTime=".."`
pub static TIME_MARKER: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"(?i)<SystemTime>([^<]+)</SystemTime>|SystemTime="([^"]+)""#));

/// Generic record boundary, used when no time marker is present
pub static EVENT_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?si)<Event[\s>].*?</Event>"));

pub const MAX_FALLBACK_MESSAGE: usize = 500;
const MAX_DATA_VALUES: usize = 5;

/// Event id, or 0 when absent or out of range.
pub fn event_id(xml: &str) -> u32 {
    EVENT_ID
        .captures(xml)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Numeric levels map 1 = Critical .. 5 = Verbose; names are taken as-is.
pub fn level(xml: &str) -> Level {
    match LEVEL.captures(xml).and_then(|caps| caps.get(1)) {
        Some(m) => match m.as_str().parse::<u32>() {
            Ok(code) => Level::from_code(code),
            Err(_) => Level::from_label(m.as_str()),
        },
        None => Level::Information,
    }
}

/// Provider name, then channel, then "Unknown".
pub fn source(xml: &str) -> String {
    PROVIDER
        .captures(xml)
        .or_else(|| CHANNEL.captures(xml))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn system_time(xml: &str) -> Option<&str> {
    let caps = TIME_MARKER.captures(xml)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Named data as `name: value`, then unnamed values not already seen,
/// joined with ` | `. Without data, the first 500 characters of the markup.
pub fn structured_message(xml: &str) -> String {
    let mut parts = Vec::new();
    let mut named_values = Vec::new();

    for caps in NAMED_DATA.captures_iter(xml) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if !value.as_str().is_empty() {
            parts.push(format!("{}: {}", name.as_str(), value.as_str()));
            named_values.push(value.as_str());
        }
    }

    for value in UNNAMED_DATA.captures_iter(xml).filter_map(|caps| caps.get(1)) {
        if !named_values.contains(&value.as_str()) {
            parts.push(value.as_str().to_string());
        }
    }

    if parts.is_empty() {
        truncate_chars(xml, MAX_FALLBACK_MESSAGE)
    } else {
        parts.join(" | ")
    }
}

/// Up to five data values joined with ` | `, capped at 500 characters.
pub fn data_summary(context: &str) -> String {
    let values: Vec<&str> = ANY_DATA
        .captures_iter(context)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .take(MAX_DATA_VALUES)
        .collect();

    if values.is_empty() {
        "Event data available".to_string()
    } else {
        truncate_chars(&values.join(" | "), MAX_FALLBACK_MESSAGE)
    }
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn timestamp_of(raw: Option<&str>) -> ParsedTimestamp {
    raw.map(timestamp::parse_system_time).unwrap_or_else(ParsedTimestamp::now)
}

/// Fields of one complete record rendered as XML.
pub fn structured_record(sequence: u64, xml: &str) -> RecordFields {
    let ts = timestamp_of(system_time(xml));
    RecordFields {
        sequence,
        level: level(xml),
        source: source(xml),
        event_id: event_id(xml),
        timestamp: ts.value,
        timestamp_estimated: ts.estimated,
        message: structured_message(xml),
    }
}

/// Best-effort fields from a window of scanned text.
pub fn scanned_record(sequence: u64, context: &str, time: Option<&str>) -> RecordFields {
    let ts = timestamp_of(time);
    RecordFields {
        sequence,
        level: level(context),
        source: source(context),
        event_id: event_id(context),
        timestamp: ts.value,
        timestamp_estimated: ts.estimated,
        message: data_summary(context),
    }
}
