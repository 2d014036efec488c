//! Remote ref listing
//!
//! The resolver works on a [`RemoteRefs`] snapshot; this module produces one
//! from a repository URL, the way `git ls-remote` does.
//!
//! - [`SmartHttpLister`]: git smart-HTTP ref advertisement over reqwest
//! - [`GitCliLister`]: shells out to `git ls-remote --symref`
//! - [`DefaultLister`]: picks one of the above from the URL scheme

pub mod git;
pub mod http;

#[cfg(test)]
use mockall::automock;

use crate::version::error::FetchError;
use crate::version::types::RemoteRefs;

pub use git::GitCliLister;
pub use http::SmartHttpLister;

/// Trait for listing the refs of a remote repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RemoteLister: Send + Sync {
    /// Fetches every ref the remote advertises
    ///
    /// # Arguments
    /// * `url` - Repository URL (`https://github.com/owner/repo`, `git@host:path`, ...)
    ///
    /// # Returns
    /// * `Ok(RemoteRefs)` - Refs and symbolic refs such as `HEAD`
    /// * `Err(FetchError)` - If the remote can't be reached or read
    async fn list_refs(&self, url: &str) -> Result<RemoteRefs, FetchError>;
}

/// Lists HTTP(S) remotes natively and everything else through git
pub struct DefaultLister {
    http: SmartHttpLister,
    git: GitCliLister,
}

impl DefaultLister {
    pub fn new(http: SmartHttpLister, git: GitCliLister) -> Self {
        Self { http, git }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[async_trait::async_trait]
impl RemoteLister for DefaultLister {
    async fn list_refs(&self, url: &str) -> Result<RemoteRefs, FetchError> {
        if is_http_url(url) {
            self.http.list_refs(url).await
        } else {
            self.git.list_refs(url).await
        }
    }
}
