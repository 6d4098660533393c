//! Deterministic recursive file listing

use crate::{Error, NormalizedPath, Result};
use walkdir::{DirEntry, WalkDir};

fn is_hidden_entry(entry: &DirEntry) -> bool {
    entry.depth() > 0 && NormalizedPath::new(entry.file_name()).is_hidden()
}

/// List every regular file below `dir`, sorted by normalized path.
///
/// Hidden files and anything inside hidden directories are skipped. A
/// directory that does not exist yields an empty listing.
pub fn list_files(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    if !dir.is_dir() {
        tracing::debug!(%dir, "Directory does not exist, nothing to list");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir.to_native())
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden_entry(entry));

    for entry in walker {
        let entry = entry.map_err(|e| Error::Walk {
            path: e
                .path()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dir.to_native()),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            files.push(NormalizedPath::new(entry.path()));
        }
    }

    files.sort();
    Ok(files)
}
