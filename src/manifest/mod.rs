//! Plugin manifest files
//!
//! A manifest is a YAML mapping describing one plugin. Only a handful of
//! keys matter to these tools (`homepage`, `version`, `url`, `iconUrl`,
//! `autoupdate`); everything else is carried through untouched and in its
//! original order.
//!
//! # Modules
//!
//! - [`autoupdate`]: The `autoupdate` section and `$version` templating
//! - [`discovery`]: Finding manifest files under a path

pub mod autoupdate;
pub mod discovery;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml_ng::{Mapping, Value};
use thiserror::Error;

pub use autoupdate::{AutoupdateSpec, VERSION_PLACEHOLDER, apply_version, substitute_version};
pub use discovery::discover_manifests;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("Manifest is not a mapping")]
    NotAMapping,

    #[error("Missing required field '{0}'")]
    MissingField(String),

    #[error("Invalid autoupdate section: {0}")]
    InvalidAutoupdate(String),

    #[error("No such file or directory: {0}")]
    NotFound(PathBuf),
}

/// One plugin manifest, key order preserved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    fields: Mapping,
}

impl Manifest {
    pub fn from_yaml_str(content: &str) -> Result<Self, ManifestError> {
        match serde_yaml_ng::from_str::<Value>(content)? {
            Value::Mapping(fields) => Ok(Self { fields }),
            _ => Err(ManifestError::NotAMapping),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_string(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml_ng::to_string(&self.fields)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let content = self.to_yaml_string()?;
        std::fs::write(path, content).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String value of `key`, `None` when absent or not a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn require_str(&self, key: &str) -> Result<&str, ManifestError> {
        self.get_str(key)
            .ok_or_else(|| ManifestError::MissingField(key.to_string()))
    }

    pub fn homepage(&self) -> Option<&str> {
        self.get_str("homepage")
    }

    pub fn version(&self) -> Option<&str> {
        self.get_str("version")
    }

    /// Set `key` to a string, keeping its position if it already exists
    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.fields
            .insert(Value::String(key.to_string()), Value::String(value.into()));
    }

    /// Typed view of the `autoupdate` section, if the manifest has one
    pub fn autoupdate(&self) -> Result<Option<AutoupdateSpec>, ManifestError> {
        self.get("autoupdate")
            .map(|section| {
                serde_yaml_ng::from_value(section.clone())
                    .map_err(|e| ManifestError::InvalidAutoupdate(e.to_string()))
            })
            .transpose()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = "\
name: Example Plugin
homepage: https://github.com/owner/example
version: 1.0.0
url: https://github.com/owner/example/archive/1.0.0.zip
";

    #[test]
    fn from_yaml_str_reads_fields() {
        let manifest = Manifest::from_yaml_str(MANIFEST).unwrap();

        assert_eq!(manifest.homepage(), Some("https://github.com/owner/example"));
        assert_eq!(manifest.version(), Some("1.0.0"));
        assert_eq!(manifest.get_str("missing"), None);
    }

    #[test]
    fn from_yaml_str_rejects_non_mapping() {
        let result = Manifest::from_yaml_str("- a\n- b\n");
        assert!(matches!(result, Err(ManifestError::NotAMapping)));
    }

    #[test]
    fn from_yaml_str_rejects_empty_document() {
        let result = Manifest::from_yaml_str("");
        assert!(matches!(result, Err(ManifestError::NotAMapping)));
    }

    #[test]
    fn require_str_reports_missing_field() {
        let manifest = Manifest::from_yaml_str(MANIFEST).unwrap();

        let result = manifest.require_str("iconUrl");

        assert!(matches!(result, Err(ManifestError::MissingField(field)) if field == "iconUrl"));
    }

    #[test]
    fn set_string_keeps_key_order() {
        let mut manifest = Manifest::from_yaml_str(MANIFEST).unwrap();

        manifest.set_string("version", "2.0.0");
        manifest.set_string("extra", "value");

        let keys: Vec<&str> = manifest
            .as_mapping()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["name", "homepage", "version", "url", "extra"]);
        assert_eq!(manifest.version(), Some("2.0.0"));
    }

    #[test]
    fn save_and_load_preserve_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("example.yaml");
        let manifest = Manifest::from_yaml_str(MANIFEST).unwrap();

        manifest.save(&path).unwrap();
        let loaded = Manifest::load(&path).unwrap();

        assert_eq!(loaded, manifest);
    }

    #[test]
    fn load_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = Manifest::load(&temp_dir.path().join("missing.yaml"));

        assert!(matches!(result, Err(ManifestError::Read { .. })));
    }

    #[test]
    fn autoupdate_is_none_without_section() {
        let manifest = Manifest::from_yaml_str(MANIFEST).unwrap();
        assert_eq!(manifest.autoupdate().unwrap(), None);
    }
}
