//! `fix-updater-json`

use anyhow::{Context, Result};
use relkit_core::updater_manifest::{self, ManifestFixConfig};
use relkit_core::{ConsoleReporter, SystemRunner};
use tracing::debug;

use crate::ManifestArgs;

/// Rebuild and republish `latest.json` for a release.
pub fn fix_updater_json(args: ManifestArgs) -> Result<()> {
    if args.tag.trim_start_matches('v').is_empty() {
        anyhow::bail!("Invalid release tag: '{}'", args.tag);
    }

    let config = ManifestFixConfig::new(args.tag, args.repo).with_gh_program(args.gh);
    debug!(tag = %config.tag, repo = %config.repo, gh = %config.gh_program, "starting manifest fix");
    updater_manifest::fix(&config, &SystemRunner, &ConsoleReporter)
        .with_context(|| format!("Failed to fix updater manifest for {}", config.tag))?;
    Ok(())
}
