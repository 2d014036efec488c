//! URL liveness checks for plugin manifests
//!
//! Each manifest's `url` and optional `iconUrl` are probed with a HEAD
//! request. Every check returns its own [`UrlCheck`]; callers aggregate the
//! failures.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::config::HttpConfig;
use crate::manifest::{Manifest, ManifestError};
use crate::retry::RetryPolicy;

/// Outcome of probing one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlStatus {
    /// Final response status below 400
    Ok(u16),
    /// Final response status of 400 or above
    HttpError(u16),
    /// No response at all (DNS, TLS, timeout, ...)
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCheck {
    pub url: String,
    pub status: UrlStatus,
}

impl UrlCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, UrlStatus::Ok(_))
    }
}

impl fmt::Display for UrlCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            UrlStatus::Ok(code) => write!(f, "  OK {}\t{}", code, self.url),
            UrlStatus::HttpError(code) => write!(f, "  ERROR {}\t{}", code, self.url),
            UrlStatus::Unreachable(reason) => write!(f, "  ERROR {}\t{}", reason, self.url),
        }
    }
}

enum HeadFailure {
    Status(u16),
    Network(reqwest::Error),
}

impl HeadFailure {
    fn is_transient(&self) -> bool {
        match self {
            HeadFailure::Status(code) => *code >= 500,
            // A URL that fails to build never will.
            HeadFailure::Network(e) => !e.is_builder(),
        }
    }
}

/// Issues HEAD requests with bounded retries
pub struct UrlChecker {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl UrlChecker {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .expect("Failed to create HTTP client"),
            retry: RetryPolicy::from(config),
        }
    }

    async fn head_once(&self, url: &str) -> Result<u16, HeadFailure> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(HeadFailure::Network)?;

        let status = response.status().as_u16();
        if status >= 400 {
            Err(HeadFailure::Status(status))
        } else {
            Ok(status)
        }
    }

    /// Probe `url`; server errors and network failures are retried, malformed
    /// URLs are not.
    pub async fn check_url(&self, url: &str) -> UrlCheck {
        debug!("Checking {}", url);
        let status = match self
            .retry
            .run(HeadFailure::is_transient, || self.head_once(url))
            .await
        {
            Ok(code) => UrlStatus::Ok(code),
            Err(HeadFailure::Status(code)) => UrlStatus::HttpError(code),
            Err(HeadFailure::Network(e)) => UrlStatus::Unreachable(e.to_string()),
        };

        UrlCheck {
            url: url.to_string(),
            status,
        }
    }

    /// Check `url` and, when present and non-empty, `iconUrl`
    pub async fn check_manifest(&self, manifest: &Manifest) -> Result<Vec<UrlCheck>, ManifestError> {
        let url = manifest.require_str("url")?;
        let mut checks = vec![self.check_url(url).await];

        if let Some(icon_url) = manifest.get_str("iconUrl").filter(|u| !u.is_empty()) {
            checks.push(self.check_url(icon_url).await);
        }

        Ok(checks)
    }
}
