//! Git smart-HTTP ref advertisement
//!
//! `GET <repo>/info/refs?service=git-upload-pack` answers with a pkt-line
//! stream:
//!
//! ```text
//! 001e# service=git-upload-pack\n
//! 0000
//! 00..<oid> HEAD\0multi_ack symref=HEAD:refs/heads/main ...\n
//! 00..<oid> refs/heads/main\n
//! 0000
//! ```
//!
//! Each pkt-line starts with four hex digits giving its length including
//! the prefix; `0000` is a flush packet.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::remote::RemoteLister;
use crate::retry::RetryPolicy;
use crate::version::error::FetchError;
use crate::version::types::RemoteRefs;

const SERVICE_QUERY: &str = "info/refs?service=git-upload-pack";

/// Lists refs over git's smart-HTTP protocol
pub struct SmartHttpLister {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl SmartHttpLister {
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

    async fn fetch_once(&self, url: &str) -> Result<RemoteRefs, FetchError> {
        let endpoint = format!("{}/{}", url.trim_end_matches('/'), SERVICE_QUERY);
        debug!("Listing refs from {}", endpoint);

        let response = self.client.get(&endpoint).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized(url.to_string()));
        }

        if !status.is_success() {
            warn!("Ref advertisement returned status {}: {}", status, endpoint);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        parse_advertisement(&body)
    }
}

#[async_trait::async_trait]
impl RemoteLister for SmartHttpLister {
    async fn list_refs(&self, url: &str) -> Result<RemoteRefs, FetchError> {
        self.retry
            .run(FetchError::is_transient, || self.fetch_once(url))
            .await
    }
}

/// Decode a v0 ref advertisement into refs and symrefs
pub fn parse_advertisement(body: &[u8]) -> Result<RemoteRefs, FetchError> {
    let mut refs = RemoteRefs::default();
    let mut rest = body;

    while !rest.is_empty() {
        let (payload, tail) = next_pkt_line(rest)?;
        rest = tail;

        let Some(payload) = payload else {
            continue;
        };
        let line = std::str::from_utf8(payload)
            .map_err(|e| FetchError::InvalidResponse(format!("pkt-line is not UTF-8: {e}")))?;
        let line = line.strip_suffix('\n').unwrap_or(line);

        if line.starts_with("# service=") || line.starts_with("version ") {
            continue;
        }

        let (line, capabilities) = match line.split_once('\0') {
            Some((line, caps)) => (line, Some(caps)),
            None => (line, None),
        };

        for (name, target) in capabilities.into_iter().flat_map(parse_symrefs) {
            refs.symrefs.insert(name.to_string(), target.to_string());
        }

        let (oid, name) = line
            .split_once(' ')
            .ok_or_else(|| FetchError::InvalidResponse(format!("malformed ref line: {line}")))?;

        // Peeled tags and the empty-repository placeholder.
        if name.ends_with("^{}") {
            continue;
        }
        refs.refs.insert(name.to_string(), oid.to_string());
    }

    Ok(refs)
}

/// Split one pkt-line off `data`; `None` payload for flush/delimiter packets.
fn next_pkt_line(data: &[u8]) -> Result<(Option<&[u8]>, &[u8]), FetchError> {
    let header = data
        .get(..4)
        .ok_or_else(|| FetchError::InvalidResponse("truncated pkt-line header".to_string()))?;
    let len = std::str::from_utf8(header)
        .ok()
        .and_then(|h| usize::from_str_radix(h, 16).ok())
        .ok_or_else(|| {
            FetchError::InvalidResponse(format!(
                "invalid pkt-line length {:?}",
                String::from_utf8_lossy(header)
            ))
        })?;

    if len < 4 {
        return Ok((None, &data[4..]));
    }

    if len > data.len() {
        return Err(FetchError::InvalidResponse(format!(
            "pkt-line of {len} bytes exceeds remaining {} bytes",
            data.len()
        )));
    }

    Ok((Some(&data[4..len]), &data[len..]))
}

fn parse_symrefs(capabilities: &str) -> impl Iterator<Item = (&str, &str)> {
    capabilities
        .split(' ')
        .filter_map(|cap| cap.strip_prefix("symref="))
        .filter_map(|symref| symref.split_once(':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn pkt(line: &str) -> String {
        format!("{:04x}{}", line.len() + 4, line)
    }

    fn advertisement() -> String {
        [
            pkt("# service=git-upload-pack\n"),
            "0000".to_string(),
            pkt("1111111111111111111111111111111111111111 HEAD\0multi_ack thin-pack symref=HEAD:refs/heads/master agent=git/2.40\n"),
            pkt("1111111111111111111111111111111111111111 refs/heads/master\n"),
            pkt("2222222222222222222222222222222222222222 refs/tags/v1.0.0\n"),
            pkt("3333333333333333333333333333333333333333 refs/tags/v1.0.0^{}\n"),
            "0000".to_string(),
        ]
        .concat()
    }

    fn test_config() -> HttpConfig {
        HttpConfig {
            max_attempts: 3,
            retry_backoff_ms: 0,
            ..HttpConfig::default()
        }
    }

    #[test]
    fn parse_advertisement_reads_refs_and_symrefs() {
        let refs = parse_advertisement(advertisement().as_bytes()).unwrap();

        assert_eq!(
            refs,
            RemoteRefs::from_refs([
                ("HEAD", "1111111111111111111111111111111111111111"),
                ("refs/heads/master", "1111111111111111111111111111111111111111"),
                ("refs/tags/v1.0.0", "2222222222222222222222222222222222222222"),
            ])
            .with_symref("HEAD", "refs/heads/master")
        );
    }

    #[test]
    fn parse_advertisement_handles_empty_repository() {
        let body = [
            pkt("0000000000000000000000000000000000000000 capabilities^{}\0report-status\n"),
            "0000".to_string(),
        ]
        .concat();

        let refs = parse_advertisement(body.as_bytes()).unwrap();

        assert!(refs.is_empty());
    }

    #[test]
    fn parse_advertisement_rejects_truncated_packet() {
        let result = parse_advertisement(b"00ffshort");
        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }

    #[test]
    fn parse_advertisement_rejects_bad_length() {
        let result = parse_advertisement(b"zzzz");
        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn list_refs_fetches_advertisement() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/owner/plugin/info/refs")
            .match_query(Matcher::UrlEncoded(
                "service".into(),
                "git-upload-pack".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/x-git-upload-pack-advertisement")
            .with_body(advertisement())
            .create_async()
            .await;

        let lister = SmartHttpLister::new(&test_config());
        let refs = lister
            .list_refs(&format!("{}/owner/plugin/", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(refs.default_branch(), Some("master"));
        assert_eq!(
            refs.refs.get("refs/tags/v1.0.0").map(String::as_str),
            Some("2222222222222222222222222222222222222222")
        );
    }

    #[tokio::test]
    async fn list_refs_returns_not_found_for_missing_repo() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/missing/repo/info/refs")
            .match_query(Matcher::Any)
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let lister = SmartHttpLister::new(&test_config());
        let result = lister
            .list_refs(&format!("{}/missing/repo", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_refs_returns_unauthorized_for_401() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/private/repo/info/refs")
            .match_query(Matcher::Any)
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let lister = SmartHttpLister::new(&test_config());
        let result = lister
            .list_refs(&format!("{}/private/repo", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn list_refs_retries_server_errors() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/flaky/repo/info/refs")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let lister = SmartHttpLister::new(&test_config());
        let result = lister
            .list_refs(&format!("{}/flaky/repo", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(FetchError::Status { status: 503, .. })
        ));
    }
}
