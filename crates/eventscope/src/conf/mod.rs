//! Conf module: analyzer configuration model and loading.

pub mod model;
pub mod load;

pub use model::{
    AnalysisScope, AnalyzerConfig, BinaryConfig, ConfigError, DetectionConfig, DiscoveryConfig,
    RuleConfig,
};
