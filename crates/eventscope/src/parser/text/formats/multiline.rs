use super::RawFields;
use crate::parser::traits::{EventBlock, ParseError, RecordFields, TextFormat};

/// `Key: value` lines in any order, each optional, terminated by `Message:`.
/// A leading dash line is allowed.
pub struct MultilineFormat;

impl TextFormat for MultilineFormat {
    fn name(&self) -> &'static str {
        "multiline"
    }

    fn extract(&self, block: &EventBlock<'_>) -> Option<Result<RecordFields, ParseError>> {
        if !block.rest.trim().is_empty() {
            return None;
        }

        let body = block.body;
        let mut fields = RawFields::default();
        let mut offset = 0;
        let mut first = true;

        for line in body.split_inclusive('\n') {
            let start = offset;
            offset += line.len();

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if first && trimmed.chars().all(|c| c == '-') {
                first = false;
                continue;
            }
            first = false;

            let colon = line.find(':')?;
            let key = line[..colon].trim().to_ascii_lowercase();
            let value = line[colon + 1..].trim();

            match key.as_str() {
                "message" => {
                    fields.message = &body[start + colon + 1..];
                    return Some(fields.into_record(block.number));
                }
                "level" => fields.level = Some(value),
                "source" => fields.source = Some(value),
                "event id" => fields.event_id = Some(value),
                "time" => fields.time = Some(value),
                "category" => {}
                _ => return None,
            }
        }

        None
    }
}
