//! Derived catalog artifacts
//!
//! - [`index`]: All manifests of a directory as one YAML sequence
//! - [`table`]: Markdown table of plugins, rendered from that index

pub mod index;
pub mod table;

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ManifestError;

pub use index::{build_index, load_index, render_index};
pub use table::{TableRow, render_table};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{path}: {source}")]
    Manifest {
        path: PathBuf,
        source: ManifestError,
    },

    #[error("Invalid index: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Plugin #{index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Plugin #{index} has an invalid '{field}' field")]
    InvalidField { index: usize, field: &'static str },
}
