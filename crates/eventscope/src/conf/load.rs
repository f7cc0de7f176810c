//! Load: config loading from file and environment variables.

use std::path::{Path, PathBuf};

use super::model::{AnalysisScope, AnalyzerConfig, ConfigError};

const DEFAULT_CONFIG_FILE: &str = "eventscope.toml";

impl AnalyzerConfig {
    /// Load configuration from file, then apply environment overrides.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("EVENTSCOPE_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_string(),
            source,
        })
    }

    /// Apply `EVENTSCOPE_*` overrides. `lookup` is injected so tests don't
    /// have to mutate the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("EVENTSCOPE_LOGS_DIR") {
            self.logs_dir = PathBuf::from(dir);
        }
        if let Some(scope) = lookup("EVENTSCOPE_SCOPE") {
            self.scope = AnalysisScope::parse(&scope).ok_or_else(|| {
                ConfigError::Invalid(format!("EVENTSCOPE_SCOPE must be 'network' or 'all', got '{}'", scope))
            })?;
        }
        if let Some(min) = lookup("EVENTSCOPE_MIN_OWNERS") {
            self.detection.min_affected_owners = min.parse().map_err(|_| {
                ConfigError::Invalid(format!("EVENTSCOPE_MIN_OWNERS must be a number, got '{}'", min))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_applied() {
        let mut cfg = AnalyzerConfig::default();
        cfg.apply_env_overrides(env(&[
            ("EVENTSCOPE_LOGS_DIR", "/data/logs"),
            ("EVENTSCOPE_SCOPE", "all"),
            ("EVENTSCOPE_MIN_OWNERS", "3"),
        ]))
        .unwrap();

        assert_eq!(cfg.logs_dir, PathBuf::from("/data/logs"));
        assert_eq!(cfg.scope, AnalysisScope::All);
        assert_eq!(cfg.detection.min_affected_owners, 3);
    }

    #[test]
    fn test_env_overrides_absent_keeps_defaults() {
        let mut cfg = AnalyzerConfig::default();
        cfg.apply_env_overrides(env(&[])).unwrap();
        assert_eq!(cfg.logs_dir, PathBuf::from("analysis_logs"));
        assert_eq!(cfg.scope, AnalysisScope::Network);
    }

    #[test]
    fn test_env_override_invalid_scope() {
        let mut cfg = AnalyzerConfig::default();
        let err = cfg.apply_env_overrides(env(&[("EVENTSCOPE_SCOPE", "galaxy")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_env_override_invalid_min_owners() {
        let mut cfg = AnalyzerConfig::default();
        let err = cfg.apply_env_overrides(env(&[("EVENTSCOPE_MIN_OWNERS", "many")])).unwrap_err();
        assert!(err.to_string().contains("EVENTSCOPE_MIN_OWNERS"));
    }

    #[test]
    fn test_from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logs_dir = \"fleet\"\n[detection]\nmin_affected_owners = 2").unwrap();

        let cfg = AnalyzerConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.logs_dir, PathBuf::from("fleet"));
        assert_eq!(cfg.detection.min_affected_owners, 2);
    }

    #[test]
    fn test_from_file_missing() {
        let err = AnalyzerConfig::from_file("/nonexistent/eventscope.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logs_dir = [unterminated").unwrap();

        let err = AnalyzerConfig::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }
}
