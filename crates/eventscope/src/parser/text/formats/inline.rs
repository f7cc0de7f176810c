use std::sync::LazyLock;
use regex::Regex;

use super::RawFields;
use crate::parser::traits::{EventBlock, ParseError, RecordFields, TextFormat};

/// Legacy shape: `Event #N - Level: .. Source: .. Event ID: .. Time: .. Message: ..`
/// with the message continuing onto following lines.
static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)\A[ \t]*-+[ \t]*",
        r"Level:[ \t]*(\w+)\s*",
        r"Source:[ \t]*(.*?)\s*",
        r"Event ID:[ \t]*(\d+)\s*",
        r"Time:[ \t]*([0-9/:. \-]+?)\s*",
        r"Message:(.*)\z",
    ))
    .expect("valid pattern")
});

pub struct InlineFormat;

impl TextFormat for InlineFormat {
    fn name(&self) -> &'static str {
        "inline"
    }

    fn extract(&self, block: &EventBlock<'_>) -> Option<Result<RecordFields, ParseError>> {
        let caps = INLINE.captures(block.text)?;
        let group = |i: usize| caps.get(i).map(|m| m.as_str());

        let fields = RawFields {
            level: group(1),
            source: group(2),
            event_id: group(3),
            time: group(4),
            message: group(5).unwrap_or_default(),
        };
        Some(fields.into_record(block.number))
    }
}
