use std::path::{Component, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Every directory below `root` (root excluded) in name order. Symlinked
/// directories are followed; entries that cannot be read, including link
/// loops, are logged and skipped.
pub fn directories(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => Some(entry.into_path()),
            Ok(_) => None,
            Err(e) => {
                warn!(path = ?e.path(), "Skipping unreadable directory: {}", e);
                None
            }
        })
        .collect()
}

/// Regular files directly inside `dir`, sorted.
pub fn files_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Path components of `dir` below `root`.
pub fn relative_segments(root: &Path, dir: &Path) -> Vec<String> {
    dir.strip_prefix(root)
        .map(|rel| {
            rel.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
