use std::fmt;
use std::sync::Arc;

use super::native::{self, NativeEventLog};
use crate::conf::BinaryConfig;

/// Which binary decoding tiers the parser may use. The heuristic scanner is
/// always present and needs no entry here.
#[derive(Clone, Default)]
pub struct DecoderCapabilities {
    pub structured: bool,
    pub native: Option<Arc<dyn NativeEventLog>>,
}

impl fmt::Debug for DecoderCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderCapabilities")
            .field("structured", &self.structured)
            .field("native", &self.native.is_some())
            .finish()
    }
}

impl DecoderCapabilities {
    /// Capabilities of this host, narrowed by configuration.
    pub fn detect(config: &BinaryConfig) -> Self {
        Self {
            structured: config.structured_decoder,
            native: if config.native_api {
                native::platform_event_log()
            } else {
                None
            },
        }
    }

    pub fn heuristic_only() -> Self {
        Self::default()
    }

    pub fn with_structured(mut self, enabled: bool) -> Self {
        self.structured = enabled;
        self
    }

    pub fn with_native(mut self, log: Arc<dyn NativeEventLog>) -> Self {
        self.native = Some(log);
        self
    }
}
