//! Boot: logging init and config load.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::{AnalyzerConfig, ConfigError};

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventscope=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load and validate configuration.
pub fn boot() -> Result<AnalyzerConfig, Box<dyn std::error::Error>> {
    info!("Starting eventscope v{}", env!("CARGO_PKG_VERSION"));

    let config = AnalyzerConfig::load()?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        ConfigError::Invalid(e)
    })?;

    info!(
        "Loaded configuration: logs_dir={}, scope={:?}, log_types={}",
        config.logs_dir.display(),
        config.scope,
        config.log_types.len()
    );
    info!(
        "Detection: min_affected_owners={}, fingerprint_includes_level={}, custom_rules={}",
        config.detection.min_affected_owners,
        config.detection.fingerprint_includes_level,
        config.detection.custom_rules.len()
    );

    Ok(config)
}
