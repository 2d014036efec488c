//! `autoupdate`: pin manifests to their newest upstream revision

use std::path::{Path, PathBuf};

use anyhow::bail;
use thiserror::Error;
use tracing::{error, info};

use crate::manifest::{Manifest, ManifestError, apply_version, discover_manifests};
use crate::remote::RemoteLister;
use crate::version::error::{FetchError, ResolveError};
use crate::version::resolver::resolve_latest;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Failed to list refs of {url}: {source}")]
    Fetch { url: String, source: FetchError },
}

/// What happened to one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No `autoupdate` section
    Skipped,
    /// Already at the latest version
    Unchanged { version: String },
    /// Version (and templates) rewritten
    Updated {
        previous: Option<String>,
        version: String,
    },
}

/// Per-file results of an autoupdate run
#[derive(Debug, Default)]
pub struct AutoupdateSummary {
    pub results: Vec<(PathBuf, Result<UpdateOutcome, UpdateError>)>,
}

impl AutoupdateSummary {
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &UpdateError)> {
        self.results
            .iter()
            .filter_map(|(path, result)| result.as_ref().err().map(|e| (path.as_path(), e)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn updated(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, result)| matches!(result, Ok(UpdateOutcome::Updated { .. })))
            .count()
    }
}

/// Resolve and apply the latest version for one manifest file.
///
/// With `dry_run` the file is left untouched.
pub async fn update_manifest(
    path: &Path,
    lister: &dyn RemoteLister,
    dry_run: bool,
) -> Result<UpdateOutcome, UpdateError> {
    info!("Running autoupdate for {}", path.display());
    let mut manifest = Manifest::load(path)?;

    let Some(spec) = manifest.autoupdate()? else {
        info!("No autoupdate section, skipping");
        return Ok(UpdateOutcome::Skipped);
    };

    let mode = spec.update_mode()?;
    let url = spec.update_url(&manifest)?.to_string();
    let refs = lister
        .list_refs(&url)
        .await
        .map_err(|source| UpdateError::Fetch {
            url: url.clone(),
            source,
        })?;

    let latest = resolve_latest(mode, &refs, spec.branch.as_deref())?;
    let previous = manifest.version().map(str::to_string);

    if !apply_version(&mut manifest, &spec, &latest) {
        info!("Manifest already at version '{}'", latest);
        return Ok(UpdateOutcome::Unchanged { version: latest });
    }

    info!("Updating manifest with version '{}'", latest);
    if dry_run {
        info!("Dry run, not saving manifest");
    } else {
        info!("Saving manifest");
        manifest.save(path)?;
    }

    Ok(UpdateOutcome::Updated {
        previous,
        version: latest,
    })
}

/// Update every manifest, continuing past failures
pub async fn update_all(
    files: &[PathBuf],
    lister: &dyn RemoteLister,
    dry_run: bool,
) -> AutoupdateSummary {
    let mut summary = AutoupdateSummary::default();

    for file in files {
        let result = update_manifest(file, lister, dry_run).await;
        if let Err(e) = &result {
            error!("Error while updating {}: {}", file.display(), e);
        }
        summary.results.push((file.clone(), result));
    }

    summary
}

/// Entry point of the `autoupdate` subcommand
pub async fn run(target: &Path, lister: &dyn RemoteLister, dry_run: bool) -> anyhow::Result<()> {
    let files = discover_manifests(target)?;
    let summary = update_all(&files, lister, dry_run).await;

    println!(
        "{} manifest(s) checked, {} updated",
        summary.results.len(),
        summary.updated()
    );

    if summary.has_failures() {
        println!("\nFailed manifests:");
        for (path, e) in summary.failures() {
            println!("  {}: {}", path.display(), e);
        }
        bail!("autoupdate failed for some manifests");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockRemoteLister;
    use crate::version::types::RemoteRefs;
    use mockall::predicate::eq;
    use tempfile::TempDir;

    const TAG_MANIFEST: &str = "\
name: Example
homepage: https://github.com/owner/example
version: 1.0.0
url: https://github.com/owner/example/archive/1.0.0.zip
autoupdate:
  type: tag
  url: https://github.com/owner/example/archive/$version.zip
";

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn tag_refs() -> RemoteRefs {
        RemoteRefs::from_refs([
            ("refs/tags/1.0.0", "a"),
            ("refs/tags/1.1.0", "b"),
            ("refs/tags/nightly", "c"),
        ])
    }

    #[tokio::test]
    async fn update_manifest_rewrites_version_and_templates() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "example.yaml", TAG_MANIFEST);
        let mut lister = MockRemoteLister::new();
        lister
            .expect_list_refs()
            .with(eq("https://github.com/owner/example"))
            .times(1)
            .returning(|_| Ok(tag_refs()));

        let outcome = update_manifest(&path, &lister, false).await.unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                previous: Some("1.0.0".to_string()),
                version: "1.1.0".to_string(),
            }
        );
        let saved = Manifest::load(&path).unwrap();
        assert_eq!(saved.version(), Some("1.1.0"));
        assert_eq!(
            saved.get_str("url"),
            Some("https://github.com/owner/example/archive/1.1.0.zip")
        );
    }

    #[tokio::test]
    async fn update_manifest_dry_run_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "example.yaml", TAG_MANIFEST);
        let mut lister = MockRemoteLister::new();
        lister.expect_list_refs().returning(|_| Ok(tag_refs()));

        let outcome = update_manifest(&path, &lister, true).await.unwrap();

        assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), TAG_MANIFEST);
    }

    #[tokio::test]
    async fn update_manifest_skips_manifest_without_autoupdate() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "plain.yaml", "name: Plain\nversion: 1.0.0\n");
        let mut lister = MockRemoteLister::new();
        lister.expect_list_refs().never();

        let outcome = update_manifest(&path, &lister, false).await.unwrap();

        assert_eq!(outcome, UpdateOutcome::Skipped);
    }

    #[tokio::test]
    async fn update_manifest_uses_update_url_and_branch() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "commit.yaml",
            "homepage: https://example.com\nversion: old\nautoupdate:\n  type: commit\n  update_url: https://git.example.com/repo\n  branch: dev\n",
        );
        let mut lister = MockRemoteLister::new();
        lister
            .expect_list_refs()
            .with(eq("https://git.example.com/repo"))
            .returning(|_| {
                Ok(RemoteRefs::from_refs([
                    ("refs/heads/main", "111"),
                    ("refs/heads/dev", "222"),
                ]))
            });

        let outcome = update_manifest(&path, &lister, false).await.unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                previous: Some("old".to_string()),
                version: "222".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn update_manifest_reports_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "current.yaml",
            "homepage: https://h\nversion: 1.1.0\nautoupdate:\n  type: tag\n",
        );
        let mut lister = MockRemoteLister::new();
        lister.expect_list_refs().returning(|_| Ok(tag_refs()));

        let outcome = update_manifest(&path, &lister, false).await.unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Unchanged {
                version: "1.1.0".to_string()
            }
        );
    }

    #[tokio::test]
    async fn update_manifest_rejects_unsupported_type_before_fetching() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bad.yaml",
            "homepage: https://h\nautoupdate:\n  type: release\n",
        );
        let mut lister = MockRemoteLister::new();
        lister.expect_list_refs().never();

        let result = update_manifest(&path, &lister, false).await;

        assert!(matches!(
            result,
            Err(UpdateError::Resolve(ResolveError::UnsupportedMode(_)))
        ));
    }

    #[tokio::test]
    async fn update_manifest_wraps_fetch_errors() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "example.yaml", TAG_MANIFEST);
        let mut lister = MockRemoteLister::new();
        lister
            .expect_list_refs()
            .returning(|url| Err(FetchError::NotFound(url.to_string())));

        let result = update_manifest(&path, &lister, false).await;

        assert!(matches!(result, Err(UpdateError::Fetch { .. })));
    }

    #[tokio::test]
    async fn update_all_continues_after_failures() {
        let dir = TempDir::new().unwrap();
        let broken = write(&dir, "a.yaml", "- not a mapping\n");
        let good = write(&dir, "b.yaml", TAG_MANIFEST);
        let mut lister = MockRemoteLister::new();
        lister.expect_list_refs().returning(|_| Ok(tag_refs()));

        let summary = update_all(&[broken.clone(), good], &lister, false).await;

        assert!(summary.has_failures());
        assert_eq!(summary.updated(), 1);
        assert_eq!(
            summary.failures().map(|(p, _)| p).collect::<Vec<_>>(),
            vec![broken.as_path()]
        );
    }
}
