use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Event severity.
///
/// Parsers accept free text; anything that isn't one of the five known
/// names is treated as `Information`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Critical,
    Error,
    Warning,
    Information,
    Verbose,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Critical => "Critical",
            Level::Error => "Error",
            Level::Warning => "Warning",
            Level::Information => "Information",
            Level::Verbose => "Verbose",
        }
    }

    /// Map a free-text level label (case-insensitive).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Level::Critical,
            "error" => Level::Error,
            "warning" => Level::Warning,
            "information" => Level::Information,
            "verbose" => Level::Verbose,
            _ => Level::Information,
        }
    }

    /// Map the numeric level carried in event-log markup (1 = Critical .. 5 = Verbose).
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Level::Critical,
            2 => Level::Error,
            3 => Level::Warning,
            5 => Level::Verbose,
            _ => Level::Information,
        }
    }

    /// Warning, Error and Critical events are eligible for issue grouping.
    pub fn is_significant(&self) -> bool {
        matches!(self, Level::Critical | Level::Error | Level::Warning)
    }

    /// Display rank: Critical < Error < Warning < Information < anything else.
    pub fn rank(&self) -> u8 {
        match self {
            Level::Critical => 0,
            Level::Error => 1,
            Level::Warning => 2,
            Level::Information => 3,
            Level::Verbose => 4,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized log record.
///
/// Built once by a parser and never mutated afterwards. The identity
/// fields (`owner`, `host`, `session`) are inherited from the session
/// directory the source file was found in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Sequence number within the source file
    pub sequence: u64,
    pub level: Level,
    /// Provider / source name
    pub source: String,
    pub event_id: u32,
    pub timestamp: NaiveDateTime,
    /// True when the timestamp could not be parsed and "now" was substituted
    pub timestamp_estimated: bool,
    pub message: String,
    /// Derived from the source file name
    pub log_type: String,
    pub owner: String,
    pub host: String,
    pub session: String,
}

impl Event {
    /// Inclusive range check on the event timestamp.
    pub fn is_within(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.timestamp >= start && self.timestamp <= end
    }
}

/// Keep the events whose timestamp falls inside `[start, end]`.
pub fn filter_events_by_date(events: &[Event], start: NaiveDateTime, end: NaiveDateTime) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.is_within(start, end))
        .cloned()
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_level_from_label_known_names() {
        assert_eq!(Level::from_label("Critical"), Level::Critical);
        assert_eq!(Level::from_label("error"), Level::Error);
        assert_eq!(Level::from_label(" WARNING "), Level::Warning);
        assert_eq!(Level::from_label("Verbose"), Level::Verbose);
    }

    #[test]
    fn test_level_from_label_unknown_is_information() {
        assert_eq!(Level::from_label("Audit Success"), Level::Information);
        assert_eq!(Level::from_label(""), Level::Information);
    }

    #[test]
    fn test_level_from_code() {
        assert_eq!(Level::from_code(1), Level::Critical);
        assert_eq!(Level::from_code(2), Level::Error);
        assert_eq!(Level::from_code(3), Level::Warning);
        assert_eq!(Level::from_code(4), Level::Information);
        assert_eq!(Level::from_code(5), Level::Verbose);
        assert_eq!(Level::from_code(0), Level::Information);
    }

    #[test]
    fn test_significance() {
        assert!(Level::Critical.is_significant());
        assert!(Level::Error.is_significant());
        assert!(Level::Warning.is_significant());
        assert!(!Level::Information.is_significant());
        assert!(!Level::Verbose.is_significant());
    }

    #[test]
    fn test_rank_order() {
        assert!(Level::Critical.rank() < Level::Error.rank());
        assert!(Level::Error.rank() < Level::Warning.rank());
        assert!(Level::Warning.rank() < Level::Information.rank());
        assert!(Level::Information.rank() < Level::Verbose.rank());
    }

    #[test]
    fn test_filter_events_by_date_inclusive() {
        let mut early = event(Level::Error, "Disk", 7, "early");
        early.timestamp = ts(8, 0);
        let mut middle = event(Level::Error, "Disk", 7, "middle");
        middle.timestamp = ts(10, 0);
        let mut late = event(Level::Error, "Disk", 7, "late");
        late.timestamp = ts(12, 0);

        let kept = filter_events_by_date(&[early, middle, late], ts(10, 0), ts(12, 0));
        let messages: Vec<_> = kept.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["middle", "late"]);
    }
}
