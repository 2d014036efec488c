//! Common types for version resolution

use std::collections::BTreeMap;

/// Prefix of branch heads in a ref advertisement
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Prefix of tags in a ref advertisement
pub const TAGS_PREFIX: &str = "refs/tags/";

/// Snapshot of a remote repository's refs
///
/// Both maps are ordered, so iterating refs is deterministic for a given
/// advertisement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRefs {
    /// Full ref path (`refs/heads/main`, `refs/tags/v1.0`) to revision id
    pub refs: BTreeMap<String, String>,
    /// Symbolic ref (`HEAD`) to the ref it points at (`refs/heads/main`)
    pub symrefs: BTreeMap<String, String>,
}

impl RemoteRefs {
    /// Build a snapshot without symrefs from `(ref, revision)` pairs
    pub fn from_refs<I, K, V>(refs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            refs: refs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            symrefs: BTreeMap::new(),
        }
    }

    pub fn with_symref(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.symrefs.insert(name.into(), target.into());
        self
    }

    /// Branch name the remote's `HEAD` points at, if advertised
    pub fn default_branch(&self) -> Option<&str> {
        self.symrefs
            .get("HEAD")
            .map(|target| target.strip_prefix(HEADS_PREFIX).unwrap_or(target))
    }

    /// Revision id of `refs/heads/<branch>`
    pub fn branch_head(&self, branch: &str) -> Option<&str> {
        self.refs
            .get(&format!("{HEADS_PREFIX}{branch}"))
            .map(String::as_str)
    }

    /// Tag names (prefix stripped), in ref order
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.refs
            .keys()
            .filter_map(|name| name.strip_prefix(TAGS_PREFIX))
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
