use std::sync::LazyLock;
use regex::Regex;

use super::RawFields;
use crate::parser::traits::{EventBlock, ParseError, RecordFields, TextFormat};

/// Separator line, then Time, Level, Source, Event ID, Category and Message
/// in that exact order.
static RICH_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)\A\s*-+[ \t]*\n",
        r"[ \t]*Time:[ \t]*([^\n]*)\n",
        r"[ \t]*Level:[ \t]*([^\n]*)\n",
        r"[ \t]*Source:[ \t]*([^\n]*)\n",
        r"[ \t]*Event ID:[ \t]*([^\n]*)\n",
        r"[ \t]*Category:[ \t]*([^\n]*)\n",
        r"[ \t]*Message:(.*)\z",
    ))
    .expect("valid pattern")
});

pub struct RichFormat;

impl TextFormat for RichFormat {
    fn name(&self) -> &'static str {
        "rich"
    }

    fn extract(&self, block: &EventBlock<'_>) -> Option<Result<RecordFields, ParseError>> {
        if !block.rest.trim().is_empty() {
            return None;
        }

        let caps = RICH_BODY.captures(block.body)?;
        let group = |i: usize| caps.get(i).map(|m| m.as_str());

        let fields = RawFields {
            time: group(1),
            level: group(2),
            source: group(3),
            event_id: group(4),
            message: group(6).unwrap_or_default(),
        };
        Some(fields.into_record(block.number))
    }
}
