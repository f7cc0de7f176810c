//! Native platform event-log tier.
//!
//! The operating system's own event-log API is reached through the
//! [`NativeEventLog`] trait so the tier can be exercised with a fake.

#[cfg(windows)]
mod windows;

use std::path::Path;
use std::sync::Arc;
use chrono::{DateTime, Local};

use crate::model::Level;
use crate::parser::timestamp::ParsedTimestamp;
use crate::parser::traits::{DecodeError, DecodeTier, RecordFields, TierKind, TierOutput};

/// One record as the platform API reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeRecord {
    pub source: String,
    pub event_id: u32,
    /// Small numeric type code (1 = error, 2 = warning, 4 = information)
    pub event_type: u16,
    /// Seconds since the Unix epoch
    pub time_generated: i64,
    pub strings: Vec<String>,
}

pub trait NativeEventLog: Send + Sync {
    /// Read every record of a named log channel.
    fn read(&self, channel: &str) -> Result<Vec<NativeRecord>, DecodeError>;
}

/// The host's event-log API, when it has one.
pub fn platform_event_log() -> Option<Arc<dyn NativeEventLog>> {
    #[cfg(windows)]
    {
        Some(Arc::new(windows::WindowsEventLog))
    }
    #[cfg(not(windows))]
    {
        None
    }
}

/// Log type to platform channel. Anything unlisted reads `System`.
const CHANNELS: &[(&str, &str)] = &[
    ("System", "System"),
    ("Application", "Application"),
    ("Network", "System"),
    ("network_ncsi", "System"),
    ("network_wlan", "System"),
    ("Driver", "System"),
];

pub fn channel_for(log_type: &str) -> &'static str {
    CHANNELS
        .iter()
        .find(|(name, _)| *name == log_type)
        .map(|(_, channel)| *channel)
        .unwrap_or("System")
}

pub fn level_for_type(event_type: u16) -> Level {
    match event_type {
        1 => Level::Error,
        2 => Level::Warning,
        _ => Level::Information,
    }
}

pub struct NativeTier {
    log: Option<Arc<dyn NativeEventLog>>,
}

impl NativeTier {
    pub fn new(log: Option<Arc<dyn NativeEventLog>>) -> Self {
        Self { log }
    }
}

impl DecodeTier for NativeTier {
    fn kind(&self) -> TierKind {
        TierKind::Native
    }

    fn is_available(&self) -> bool {
        self.log.is_some()
    }

    fn decode(&self, _path: &Path, log_type: &str) -> Result<TierOutput, DecodeError> {
        let log = self.log.as_ref().ok_or(DecodeError::Unavailable("native event log"))?;
        let channel = channel_for(log_type);

        let records = log
            .read(channel)?
            .into_iter()
            .enumerate()
            .map(|(index, record)| to_fields(index as u64, record))
            .collect();

        Ok(TierOutput { records, skipped: 0 })
    }
}

fn to_fields(sequence: u64, record: NativeRecord) -> RecordFields {
    let ts = DateTime::from_timestamp(record.time_generated, 0)
        .map(|utc| ParsedTimestamp::exact(utc.with_timezone(&Local).naive_local()))
        .unwrap_or_else(ParsedTimestamp::now);

    RecordFields {
        sequence,
        level: level_for_type(record.event_type),
        source: record.source,
        event_id: record.event_id,
        timestamp: ts.value,
        timestamp_estimated: ts.estimated,
        message: record.strings.join(" | "),
    }
}
