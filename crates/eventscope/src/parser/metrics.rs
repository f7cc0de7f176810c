use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

/// Which binary decoding tier produced a file's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    Structured,
    Native,
    Heuristic,
}

impl TierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierKind::Structured => "structured",
            TierKind::Native => "native",
            TierKind::Heuristic => "heuristic",
        }
    }
}

/// A wrapper that forces the wrapped data onto its own cache line.
///
/// Session tasks update the file and record groups from different threads.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// File counters (updated once per parsed file)
#[derive(Debug, Default)]
pub struct FileMetrics {
    pub sessions: AtomicU64,
    pub text: AtomicU64,
    pub binary: AtomicU64,
    pub failed: AtomicU64,
}

/// Record counters (updated per event)
#[derive(Debug, Default)]
pub struct RecordMetrics {
    pub events: AtomicU64,
    pub skipped: AtomicU64,
    pub estimated_timestamps: AtomicU64,
    pub parse_time_nanos: AtomicU64,
}

/// Which tier won for each binary file
#[derive(Debug, Default)]
pub struct TierMetrics {
    pub structured: AtomicU64,
    pub native: AtomicU64,
    pub heuristic: AtomicU64,
    pub exhausted: AtomicU64,
}

/// Ingestion metrics for one analysis pass.
///
/// All operations use `Ordering::Relaxed`; `snapshot()` reads are not
/// transactional across fields.
#[derive(Debug, Default)]
pub struct IngestMetrics {
    pub files: CacheAligned<FileMetrics>,
    pub records: CacheAligned<RecordMetrics>,
    pub tiers: CacheAligned<TierMetrics>,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_session(&self) {
        self.files.0.sessions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one parsed file and what it produced
    #[inline]
    pub fn record_file(&self, binary: bool, events: u64, skipped: u64, estimated: u64, time_nanos: u64) {
        if binary {
            self.files.0.binary.fetch_add(1, Ordering::Relaxed);
        } else {
            self.files.0.text.fetch_add(1, Ordering::Relaxed);
        }
        self.records.0.events.fetch_add(events, Ordering::Relaxed);
        self.records.0.skipped.fetch_add(skipped, Ordering::Relaxed);
        self.records.0.estimated_timestamps.fetch_add(estimated, Ordering::Relaxed);
        self.records.0.parse_time_nanos.fetch_add(time_nanos, Ordering::Relaxed);
    }

    /// Record a file that could not be read at all
    #[inline]
    pub fn record_failed_file(&self) {
        self.files.0.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// `None` means every tier was unavailable, failed or came back empty
    #[inline]
    pub fn record_tier(&self, tier: Option<TierKind>) {
        let counter = match tier {
            Some(TierKind::Structured) => &self.tiers.0.structured,
            Some(TierKind::Native) => &self.tiers.0.native,
            Some(TierKind::Heuristic) => &self.tiers.0.heuristic,
            None => &self.tiers.0.exhausted,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let text_files = self.files.0.text.load(Ordering::Relaxed);
        let binary_files = self.files.0.binary.load(Ordering::Relaxed);
        let parsed_files = text_files + binary_files;
        let time_nanos = self.records.0.parse_time_nanos.load(Ordering::Relaxed);

        MetricsSnapshot {
            sessions: self.files.0.sessions.load(Ordering::Relaxed),
            text_files,
            binary_files,
            failed_files: self.files.0.failed.load(Ordering::Relaxed),

            events: self.records.0.events.load(Ordering::Relaxed),
            skipped_records: self.records.0.skipped.load(Ordering::Relaxed),
            estimated_timestamps: self.records.0.estimated_timestamps.load(Ordering::Relaxed),
            avg_file_parse_ms: if parsed_files > 0 {
                (time_nanos as f64 / parsed_files as f64) / 1_000_000.0
            } else {
                0.0
            },

            structured_tier: self.tiers.0.structured.load(Ordering::Relaxed),
            native_tier: self.tiers.0.native.load(Ordering::Relaxed),
            heuristic_tier: self.tiers.0.heuristic.load(Ordering::Relaxed),
            tiers_exhausted: self.tiers.0.exhausted.load(Ordering::Relaxed),
        }
    }
}

/// A read-only snapshot of ingestion metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub sessions: u64,
    pub text_files: u64,
    pub binary_files: u64,
    pub failed_files: u64,

    pub events: u64,
    pub skipped_records: u64,
    pub estimated_timestamps: u64,
    pub avg_file_parse_ms: f64,

    pub structured_tier: u64,
    pub native_tier: u64,
    pub heuristic_tier: u64,
    pub tiers_exhausted: u64,
}
