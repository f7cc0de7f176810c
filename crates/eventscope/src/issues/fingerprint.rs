//! Message normalization and fingerprinting.

use std::sync::LazyLock;
use regex::Regex;

use crate::model::Event;

/// Normalized message characters that participate in the fingerprint
pub const FINGERPRINT_CHARS: usize = 200;

/// Replacements applied in order to the lower-cased message.
static MASKS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\d{4}-\d{2}-\d{2}", "<date>"),
        (r"\d{2}:\d{2}:\d{2}", "<time>"),
        (r"0x[0-9a-f]+", "<hex>"),
        (r"\d+", "<num>"),
        (r"(?i)[a-z]:\\[^\s]+", "<path>"),
    ]
    .into_iter()
    .map(|(re, token)| (Regex::new(re).expect("valid pattern"), token))
    .collect()
});

/// Lower-case the message, mask volatile substrings and keep the first
/// [`FINGERPRINT_CHARS`] characters. Idempotent.
pub fn normalize_message(message: &str) -> String {
    let mut normalized = message.to_lowercase();
    for (re, token) in MASKS.iter() {
        normalized = re.replace_all(&normalized, *token).into_owned();
    }
    normalized.chars().take(FINGERPRINT_CHARS).collect()
}

/// Hex MD5 over `event id | source | level | normalized message`.
/// `include_level = false` drops the level so one fault logged at different
/// levels lands in one group.
pub fn fingerprint(event: &Event, include_level: bool) -> String {
    let source = event.source.trim().to_lowercase();
    let normalized = normalize_message(&event.message);

    let signature = if include_level {
        format!(
            "{}|{}|{}|{}",
            event.event_id,
            source,
            event.level.as_str().to_lowercase(),
            normalized
        )
    } else {
        format!("{}|{}|{}", event.event_id, source, normalized)
    };

    format!("{:x}", md5::compute(signature.as_bytes()))
}
