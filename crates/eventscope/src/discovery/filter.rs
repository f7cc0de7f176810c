use std::path::Path;

use crate::conf::{AnalysisScope, DiscoveryConfig};

/// Decides which files in a directory are parsed.
#[derive(Debug, Clone)]
pub struct FileFilter {
    known_names: Vec<String>,
    keywords: Vec<String>,
    extensions: Vec<String>,
    rejected_suffixes: Vec<String>,
    scope: AnalysisScope,
}

impl FileFilter {
    pub fn new(log_types: &[String], discovery: &DiscoveryConfig, scope: AnalysisScope) -> Self {
        let lower = |items: &[String]| -> Vec<String> { items.iter().map(|s| s.to_lowercase()).collect() };
        Self {
            known_names: lower(log_types),
            keywords: lower(&discovery.domain_keywords),
            extensions: discovery
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            rejected_suffixes: lower(&discovery.rejected_suffixes),
            scope,
        }
    }

    /// Configured names are always accepted. Otherwise the name must not end
    /// in a rejected suffix, must carry a whitelisted extension and, in
    /// network scope, contain a domain keyword.
    pub fn is_supported(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        if self.known_names.iter().any(|known| *known == name) {
            return true;
        }

        let path = Path::new(&name);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        if self.rejected_suffixes.iter().any(|suffix| stem.ends_with(suffix.as_str())) {
            return false;
        }

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !self.extensions.iter().any(|allowed| allowed == extension) {
            return false;
        }

        match self.scope {
            AnalysisScope::All => true,
            AnalysisScope::Network => self.keywords.iter().any(|kw| name.contains(kw.as_str())),
        }
    }
}
