//! The `autoupdate` manifest section
//!
//! ```yaml
//! autoupdate:
//!   type: tag                      # or `commit`
//!   update_url: https://...        # defaults to `homepage`
//!   branch: main                   # `commit` only, defaults to the remote HEAD
//!   url: https://.../$version.zip  # any other key is a template
//! ```
//!
//! Every key other than `type`, `update_url` and `branch` is copied to the
//! top level of the manifest with `$version` replaced by the resolved
//! version.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::manifest::{Manifest, ManifestError};
use crate::version::error::ResolveError;
use crate::version::resolver::UpdateMode;

/// Token replaced by the resolved version in template fields
pub const VERSION_PLACEHOLDER: &str = "$version";

/// Parsed `autoupdate` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutoupdateSpec {
    #[serde(rename = "type")]
    pub mode: String,
    #[serde(default)]
    pub update_url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    /// Remaining keys, in manifest order
    #[serde(flatten)]
    pub templates: IndexMap<String, String>,
}

impl AutoupdateSpec {
    pub fn update_mode(&self) -> Result<UpdateMode, ResolveError> {
        self.mode.parse()
    }

    /// Repository to query: `update_url` if set, else the manifest homepage
    pub fn update_url<'a>(&'a self, manifest: &'a Manifest) -> Result<&'a str, ManifestError> {
        match self.update_url.as_deref() {
            Some(url) => Ok(url),
            None => manifest.require_str("homepage"),
        }
    }
}

/// Replace every `$version` in `template` with `version`
pub fn substitute_version(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

/// Write `version` and every rendered template into `manifest`.
///
/// Returns whether anything changed.
pub fn apply_version(manifest: &mut Manifest, spec: &AutoupdateSpec, version: &str) -> bool {
    let mut changed = manifest.version() != Some(version);
    manifest.set_string("version", version);

    for (key, template) in &spec.templates {
        let value = substitute_version(template, version);
        changed |= manifest.get_str(key) != Some(value.as_str());
        manifest.set_string(key, value);
    }

    changed
}
