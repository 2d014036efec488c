//! `generate-index` and `generate-table`

use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::catalog::{build_index, load_index, render_index, render_table};

/// Entry point of the `generate-index` subcommand
pub fn run_index(manifest_dir: &Path, output: &Path) -> anyhow::Result<()> {
    let manifests = build_index(manifest_dir)?;
    let rendered = render_index(&manifests)?;

    std::fs::write(output, rendered)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {} manifest(s) to {}", manifests.len(), output.display());
    Ok(())
}

/// Entry point of the `generate-table` subcommand
pub fn run_table(index: &Path, output: &Path, default_icon_url: &str) -> anyhow::Result<()> {
    let plugins = load_index(index)?;
    let table = render_table(&plugins, default_icon_url)?;

    std::fs::write(output, table)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote table of {} plugin(s) to {}", plugins.len(), output.display());
    Ok(())
}
