//! Manifest file discovery

use std::path::{Path, PathBuf};

use crate::manifest::ManifestError;

const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Resolve a command-line target into manifest files.
///
/// A file is returned as is. A directory yields its YAML files (not
/// recursing), sorted by name.
pub fn discover_manifests(target: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }

    if !target.is_dir() {
        return Err(ManifestError::NotFound(target.to_path_buf()));
    }

    let entries = std::fs::read_dir(target).map_err(|source| ManifestError::Read {
        path: target.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ManifestError::Read {
                path: target.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() && is_manifest_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn is_manifest_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}
