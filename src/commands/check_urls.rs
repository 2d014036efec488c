//! `check-urls`: verify that manifest URLs resolve

use std::path::{Path, PathBuf};

use anyhow::bail;
use tracing::error;

use crate::check::{UrlCheck, UrlChecker};
use crate::manifest::{Manifest, ManifestError, discover_manifests};

/// Result of checking one manifest file
#[derive(Debug)]
pub struct PluginCheck {
    pub file: PathBuf,
    pub result: Result<Vec<UrlCheck>, ManifestError>,
}

impl PluginCheck {
    pub fn is_ok(&self) -> bool {
        self.result
            .as_ref()
            .is_ok_and(|checks| checks.iter().all(UrlCheck::is_ok))
    }

    /// Failed URL checks of this file
    pub fn failed_urls(&self) -> impl Iterator<Item = &UrlCheck> {
        self.result
            .as_ref()
            .into_iter()
            .flatten()
            .filter(|check| !check.is_ok())
    }
}

/// Check one manifest file, printing a line per URL
pub async fn check_file(checker: &UrlChecker, file: &Path) -> PluginCheck {
    println!("Checking {}", file.display());

    let result = match Manifest::load(file) {
        Ok(manifest) => checker.check_manifest(&manifest).await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(checks) => checks.iter().for_each(|check| println!("{check}")),
        Err(e) => error!("Failed to check {}: {}", file.display(), e),
    }

    PluginCheck {
        file: file.to_path_buf(),
        result,
    }
}

/// Entry point of the `check-urls` subcommand
pub async fn run(target: &Path, checker: &UrlChecker) -> anyhow::Result<()> {
    let files = discover_manifests(target)?;

    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        reports.push(check_file(checker, file).await);
    }

    if reports.iter().all(PluginCheck::is_ok) {
        return Ok(());
    }

    let failed_urls: Vec<&UrlCheck> = reports.iter().flat_map(PluginCheck::failed_urls).collect();
    if !failed_urls.is_empty() {
        println!("\nFailed URLs:");
        for check in &failed_urls {
            println!("{check}");
        }
    }

    let broken: Vec<&PluginCheck> = reports.iter().filter(|r| r.result.is_err()).collect();
    if !broken.is_empty() {
        println!("\nUnreadable manifests:");
        for report in &broken {
            if let Err(e) = &report.result {
                println!("  {}: {}", report.file.display(), e);
            }
        }
    }

    bail!(
        "{} URL(s) failed, {} manifest(s) unreadable",
        failed_urls.len(),
        broken.len()
    )
}
