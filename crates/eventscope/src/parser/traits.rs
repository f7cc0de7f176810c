use std::path::Path;

pub use super::model::{DecodeError, ParseError, RecordFields};
pub use super::metrics::TierKind;

/// One header-delimited block of a text log: `Event #<number><rest>\n<body>`.
#[derive(Debug, Clone, Copy)]
pub struct EventBlock<'a> {
    /// Digits following `Event #`
    pub number: &'a str,
    /// Remainder of the header line
    pub rest: &'a str,
    /// Lines after the header, up to the next header or end of file
    pub body: &'a str,
    /// `rest` and `body` as one contiguous slice
    pub text: &'a str,
}

/// A structural shape a text log block may be written in.
pub trait TextFormat: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when the block is not in this shape. `Some(Err)` is a block in
    /// this shape whose fields could not be converted.
    fn extract(&self, block: &EventBlock<'_>) -> Option<Result<RecordFields, ParseError>>;
}

/// Records produced by one binary decoding tier.
#[derive(Debug, Default)]
pub struct TierOutput {
    pub records: Vec<RecordFields>,
    /// Records the tier saw but could not use
    pub skipped: usize,
}

/// One strategy for decoding a binary event-log file.
pub trait DecodeTier: Send + Sync {
    fn kind(&self) -> TierKind;

    fn is_available(&self) -> bool;

    fn decode(&self, path: &Path, log_type: &str) -> Result<TierOutput, DecodeError>;
}
