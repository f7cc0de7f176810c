use std::path::Path;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::{Event, Level};

/// Per-record failure inside a text log. The record is skipped.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid number in {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Failure of one binary decoding tier. The driver moves on to the next tier.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Structured decoder error: {0}")]
    Structured(String),

    #[error("Native event log error: {0}")]
    Native(String),

    #[error("Tier unavailable: {0}")]
    Unavailable(&'static str),
}

/// Fields pulled out of one record, before session identity is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
    pub sequence: u64,
    pub level: Level,
    pub source: String,
    pub event_id: u32,
    pub timestamp: NaiveDateTime,
    pub timestamp_estimated: bool,
    pub message: String,
}

/// Identity shared by every event parsed from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub log_type: String,
    pub owner: String,
    pub host: String,
    pub session: String,
}

impl FileContext {
    /// `log_type` is the file name without its extension.
    pub fn new(path: &Path, owner: &str, host: &str, session: &str) -> Self {
        let log_type = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            log_type,
            owner: owner.to_string(),
            host: host.to_string(),
            session: session.to_string(),
        }
    }

    pub fn event(&self, fields: RecordFields) -> Event {
        Event {
            sequence: fields.sequence,
            level: fields.level,
            source: fields.source,
            event_id: fields.event_id,
            timestamp: fields.timestamp,
            timestamp_estimated: fields.timestamp_estimated,
            message: fields.message,
            log_type: self.log_type.clone(),
            owner: self.owner.clone(),
            host: self.host.clone(),
            session: self.session.clone(),
        }
    }
}
