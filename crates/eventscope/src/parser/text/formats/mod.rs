//! Text block shapes, richest first.

mod inline;
mod multiline;
mod rich;

pub use inline::InlineFormat;
pub use multiline::MultilineFormat;
pub use rich::RichFormat;

use std::sync::LazyLock;
use regex::Regex;

use crate::model::Level;
use crate::parser::timestamp::{self, ParsedTimestamp};
use crate::parser::traits::{ParseError, RecordFields};

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*={4,}[ \t]*$").expect("valid pattern"));

/// Field text as found in a block, before conversion.
#[derive(Debug, Default)]
pub(crate) struct RawFields<'a> {
    pub level: Option<&'a str>,
    pub source: Option<&'a str>,
    pub event_id: Option<&'a str>,
    pub time: Option<&'a str>,
    pub message: &'a str,
}

impl RawFields<'_> {
    /// Apply defaults: Information, "Unknown", event id 0, "now".
    pub fn into_record(self, number: &str) -> Result<RecordFields, ParseError> {
        let sequence = number.trim().parse::<u64>().map_err(|_| ParseError::InvalidNumber {
            field: "Event #",
            value: number.to_string(),
        })?;

        let event_id = match non_empty(self.event_id) {
            Some(value) => value.parse::<u32>().map_err(|_| ParseError::InvalidNumber {
                field: "Event ID",
                value: value.to_string(),
            })?,
            None => 0,
        };

        let ts = non_empty(self.time)
            .map(timestamp::normalize)
            .unwrap_or_else(ParsedTimestamp::now);

        Ok(RecordFields {
            sequence,
            level: non_empty(self.level).map(Level::from_label).unwrap_or(Level::Information),
            source: non_empty(self.source).unwrap_or("Unknown").to_string(),
            event_id,
            timestamp: ts.value,
            timestamp_estimated: ts.estimated,
            message: clean_message(self.message),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Message text up to the first `====` separator line, trimmed.
pub(crate) fn clean_message(raw: &str) -> String {
    let end = SEPARATOR.find(raw).map(|m| m.start()).unwrap_or(raw.len());
    raw[..end].trim().to_string()
}
