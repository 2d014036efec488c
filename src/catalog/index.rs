//! Full manifest index

use std::path::Path;

use tracing::debug;

use crate::catalog::CatalogError;
use crate::manifest::{Manifest, discover_manifests};

/// Load every manifest under `manifest_dir`, in file name order
pub fn build_index(manifest_dir: &Path) -> Result<Vec<Manifest>, CatalogError> {
    let files = discover_manifests(manifest_dir).map_err(|source| CatalogError::Manifest {
        path: manifest_dir.to_path_buf(),
        source,
    })?;

    files
        .iter()
        .map(|file| {
            debug!("Indexing {}", file.display());
            Manifest::load(file).map_err(|source| CatalogError::Manifest {
                path: file.clone(),
                source,
            })
        })
        .collect()
}

/// Serialize manifests as one YAML sequence, key order preserved
pub fn render_index(manifests: &[Manifest]) -> Result<String, CatalogError> {
    Ok(serde_yaml_ng::to_string(manifests)?)
}

/// Read an index written by [`render_index`]
pub fn load_index(path: &Path) -> Result<Vec<Manifest>, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_yaml_ng::from_str(&content)?)
}
