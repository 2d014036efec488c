//! `git ls-remote` backed listing for non-HTTP remotes

use std::path::PathBuf;

use tokio::process::Command;
use tracing::debug;

use crate::remote::RemoteLister;
use crate::version::error::FetchError;
use crate::version::types::RemoteRefs;

/// Lists refs by running `git ls-remote --symref`
pub struct GitCliLister {
    git: PathBuf,
}

impl GitCliLister {
    /// Creates a lister using the given git executable
    pub fn new(git: impl Into<PathBuf>) -> Self {
        Self { git: git.into() }
    }
}

impl Default for GitCliLister {
    fn default() -> Self {
        Self::new("git")
    }
}

#[async_trait::async_trait]
impl RemoteLister for GitCliLister {
    async fn list_refs(&self, url: &str) -> Result<RemoteRefs, FetchError> {
        debug!("Running git ls-remote for {}", url);

        let output = Command::new(&self.git)
            .args(["ls-remote", "--symref", url])
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Git(stderr.trim().to_string()));
        }

        Ok(parse_ls_remote(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `git ls-remote --symref` output
///
/// ```text
/// ref: refs/heads/main\tHEAD
/// <oid>\tHEAD
/// <oid>\trefs/heads/main
/// ```
pub fn parse_ls_remote(stdout: &str) -> RemoteRefs {
    let mut refs = RemoteRefs::default();

    for line in stdout.lines() {
        let Some((left, name)) = line.split_once('\t') else {
            continue;
        };

        if let Some(target) = left.strip_prefix("ref: ") {
            refs.symrefs.insert(name.to_string(), target.to_string());
        } else if !name.ends_with("^{}") {
            refs.refs.insert(name.to_string(), left.to_string());
        }
    }

    refs
}
