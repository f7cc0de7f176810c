//! Text log parsing.
//!
//! A file is split into `Event #N` blocks and every format in the chain is
//! tried against all blocks in turn. The first format that recognises at
//! least one block wins; later formats are not attempted.

pub mod formats;

use std::sync::LazyLock;
use regex::Regex;
use tracing::debug;

use self::formats::{InlineFormat, MultilineFormat, RichFormat};
use super::traits::{EventBlock, RecordFields, TextFormat};

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Event #(\d+)([^\n]*)$").expect("valid pattern"));

/// Result of parsing one text file.
#[derive(Debug, Default)]
pub struct TextOutcome {
    pub records: Vec<RecordFields>,
    /// Blocks the winning format found malformed or did not recognise
    pub skipped: usize,
    /// Name of the format that matched, if any
    pub format: Option<&'static str>,
}

pub struct TextLogParser {
    formats: Vec<Box<dyn TextFormat>>,
}

impl Default for TextLogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLogParser {
    pub fn new() -> Self {
        Self {
            // Order matters! Richest shape first
            formats: vec![
                Box::new(RichFormat),
                Box::new(MultilineFormat),
                Box::new(InlineFormat),
            ],
        }
    }

    pub fn with_formats(formats: Vec<Box<dyn TextFormat>>) -> Self {
        Self { formats }
    }

    /// Format names in the order they are tried
    pub fn format_names(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    /// Undecodable byte sequences are replaced, never fatal.
    pub fn parse_bytes(&self, bytes: &[u8]) -> TextOutcome {
        self.parse_content(&String::from_utf8_lossy(bytes))
    }

    pub fn parse_content(&self, content: &str) -> TextOutcome {
        let content = content.replace("\r\n", "\n");
        let blocks = split_blocks(&content);
        if blocks.is_empty() {
            return TextOutcome::default();
        }

        for format in &self.formats {
            let mut matched = false;
            let mut outcome = TextOutcome::default();
            let mut pending = Vec::new();

            for block in &blocks {
                match format.extract(block) {
                    None => {
                        outcome.skipped += 1;
                        pending.push(block.number);
                    }
                    Some(Ok(record)) => {
                        matched = true;
                        outcome.records.push(record);
                    }
                    Some(Err(e)) => {
                        matched = true;
                        outcome.skipped += 1;
                        debug!(format = format.name(), event = block.number, "Skipping malformed event: {}", e);
                    }
                }
            }

            if matched {
                for number in pending {
                    debug!(format = format.name(), event = number, "Skipping unrecognised event");
                }
                outcome.format = Some(format.name());
                return outcome;
            }
        }

        TextOutcome::default()
    }
}

/// Split content into header-delimited blocks. A block's body runs to the
/// next header or end of input.
pub fn split_blocks(content: &str) -> Vec<EventBlock<'_>> {
    let headers: Vec<(usize, usize, usize, usize)> = HEADER
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?;
            Some((whole.start(), number.start(), number.end(), whole.end()))
        })
        .collect();

    headers
        .iter()
        .enumerate()
        .map(|(i, &(_, number_start, number_end, line_end))| {
            let end = headers.get(i + 1).map(|h| h.0).unwrap_or(content.len());
            let body_start = if content[line_end..end].starts_with('\n') {
                line_end + 1
            } else {
                line_end
            };

            EventBlock {
                number: &content[number_start..number_end],
                rest: &content[number_end..line_end],
                body: &content[body_start..end],
                text: &content[number_end..end],
            }
        })
        .collect()
}
