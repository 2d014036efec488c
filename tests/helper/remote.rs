//! Remote listing test utilities

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use plugin_catalog::remote::RemoteLister;
use plugin_catalog::version::error::FetchError;
use plugin_catalog::version::types::RemoteRefs;

/// Static lister serving canned refs per URL
#[derive(Default)]
pub struct StaticLister {
    remotes: HashMap<String, RemoteRefs>,
    requested: Mutex<Vec<String>>,
}

impl StaticLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, url: &str, tags: &[&str]) -> Self {
        self.remotes.insert(
            url.to_string(),
            RemoteRefs::from_refs(tags.iter().map(|t| (format!("refs/tags/{t}"), "0"))),
        );
        self
    }

    pub fn with_refs(mut self, url: &str, refs: RemoteRefs) -> Self {
        self.remotes.insert(url.to_string(), refs);
        self
    }

    /// URLs asked for so far, in order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteLister for StaticLister {
    async fn list_refs(&self, url: &str) -> Result<RemoteRefs, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.remotes
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

/// Write `content` to `dir/name` and return the path
pub fn write_manifest(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
