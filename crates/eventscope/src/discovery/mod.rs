//! Discovery module: finds session directories and infers their identity.

pub mod filter;
pub mod identity;
pub mod walk;

use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use serde::Serialize;
use tracing::{debug, error, info, warn};

pub use filter::FileFilter;
pub use identity::{Identity, IdentityRules};

use crate::conf::{AnalyzerConfig, ConfigError};

/// A directory holding at least one parsable log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub owner: String,
    pub host: String,
    pub session: String,
    pub path: PathBuf,
    /// Accepted files, sorted
    pub files: Vec<PathBuf>,
}

pub struct SessionDiscoverer {
    filter: FileFilter,
    identity: IdentityRules,
}

impl SessionDiscoverer {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        let identity = IdentityRules::new(&config.discovery.host_prefix_pattern).map_err(|e| {
            ConfigError::Invalid(format!("discovery.host_prefix_pattern is not a valid regex: {}", e))
        })?;

        Ok(Self {
            filter: FileFilter::new(&config.log_types, &config.discovery, config.scope),
            identity,
        })
    }

    /// Read-only walk of `root`. Each qualifying directory is emitted once.
    pub fn discover(&self, root: &Path) -> Vec<Session> {
        self.discover_with(root, walk::files_in)
    }

    /// `list` returns the files directly inside one directory.
    fn discover_with<L>(&self, root: &Path, list: L) -> Vec<Session>
    where
        L: Fn(&Path) -> io::Result<Vec<PathBuf>>,
    {
        if !root.is_dir() {
            warn!(root = %root.display(), "Logs directory not found");
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut sessions = Vec::new();

        for dir in walk::directories(root) {
            let files = match list(&dir) {
                Ok(files) => files,
                Err(e) => {
                    warn!(path = %dir.display(), "Skipping unlistable directory: {}", e);
                    continue;
                }
            };

            let accepted: Vec<PathBuf> = files
                .into_iter()
                .filter(|path| {
                    path.file_name()
                        .is_some_and(|name| self.filter.is_supported(&name.to_string_lossy()))
                })
                .collect();
            if accepted.is_empty() {
                continue;
            }

            let key = dir.canonicalize().unwrap_or_else(|_| dir.clone());
            if !seen.insert(key) {
                continue;
            }

            let id = self.identity.infer(&walk::relative_segments(root, &dir));
            debug!(
                owner = %id.owner,
                host = %id.host,
                session = %id.session,
                files = accepted.len(),
                "Discovered session"
            );

            sessions.push(Session {
                owner: id.owner,
                host: id.host,
                session: id.session,
                path: dir,
                files: accepted,
            });
        }

        info!(root = %root.display(), sessions = sessions.len(), "Session discovery complete");
        sessions
    }
}

/// Discover sessions under `root` using `config`'s filter and host pattern.
pub fn discover_sessions(root: &Path, config: &AnalyzerConfig) -> Vec<Session> {
    match SessionDiscoverer::new(config) {
        Ok(discoverer) => discoverer.discover(root),
        Err(e) => {
            error!("Cannot discover sessions: {}", e);
            Vec::new()
        }
    }
}

/// Totals over a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub unique_owners: usize,
    pub unique_hosts: usize,
    pub owners: Vec<String>,
    pub hosts: Vec<String>,
}

impl SessionStats {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        let owners: BTreeSet<&str> = sessions.iter().map(|s| s.owner.as_str()).collect();
        let hosts: BTreeSet<&str> = sessions.iter().map(|s| s.host.as_str()).collect();

        Self {
            total_sessions: sessions.len(),
            unique_owners: owners.len(),
            unique_hosts: hosts.len(),
            owners: owners.into_iter().map(String::from).collect(),
            hosts: hosts.into_iter().map(String::from).collect(),
        }
    }
}
