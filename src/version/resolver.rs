//! Latest revision resolution
//!
//! Given a snapshot of remote refs, decides which revision identifier an
//! autoupdate should pin: the head commit of a branch, or the highest
//! version-like tag.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::version::error::ResolveError;
use crate::version::key::VersionTag;
use crate::version::types::RemoteRefs;

/// How the latest revision is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateMode {
    /// Head commit of a branch
    Commit,
    /// Highest version-like tag
    Tag,
}

impl UpdateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMode::Commit => "commit",
            UpdateMode::Tag => "tag",
        }
    }
}

impl FromStr for UpdateMode {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit" => Ok(UpdateMode::Commit),
            "tag" => Ok(UpdateMode::Tag),
            other => Err(ResolveError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the latest revision for `mode`.
///
/// * `Commit` returns the revision id of `branch`, or of the remote's
///   default branch when `branch` is `None`.
/// * `Tag` returns the original name of the highest version tag.
pub fn resolve_latest(
    mode: UpdateMode,
    refs: &RemoteRefs,
    branch: Option<&str>,
) -> Result<String, ResolveError> {
    match mode {
        UpdateMode::Commit => latest_commit(refs, branch),
        UpdateMode::Tag => latest_tag(refs),
    }
}

fn latest_commit(refs: &RemoteRefs, branch: Option<&str>) -> Result<String, ResolveError> {
    let branch = match branch.filter(|b| !b.is_empty()) {
        Some(branch) => branch,
        None => refs.default_branch().ok_or(ResolveError::Configuration)?,
    };

    refs.branch_head(branch)
        .map(str::to_string)
        .ok_or_else(|| ResolveError::BranchNotFound(branch.to_string()))
}

/// Highest version tag among `refs/tags/*`.
///
/// Refs whose names don't look like versions are ignored. Among tags with
/// equal keys the one with the greatest name wins, since refs iterate in
/// name order and `max_by` keeps the last maximum.
pub fn latest_tag(refs: &RemoteRefs) -> Result<String, ResolveError> {
    let latest = refs
        .tag_names()
        .filter_map(VersionTag::parse)
        .max_by(|a, b| a.key.cmp(&b.key))
        .ok_or(ResolveError::NoVersionTagsFound)?;

    debug!("Latest version tag is {}", latest.name);
    Ok(latest.name)
}
