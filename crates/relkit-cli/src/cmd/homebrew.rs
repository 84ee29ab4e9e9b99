//! `update-homebrew`

use anyhow::{Context, Result};
use relkit_core::homebrew::{self, HomebrewConfig};
use relkit_core::io::download::build_client;
use relkit_core::{ConsoleReporter, SystemRunner};
use tracing::debug;

use crate::HomebrewArgs;

/// Hash the release assets and update the tap.
pub async fn update_homebrew(args: HomebrewArgs) -> Result<()> {
    let config = HomebrewConfig::new(
        args.repository,
        args.release_version,
        args.tap_repository,
        args.credential,
    )
    .with_dry_run(args.dry_run)
    .with_sign_commits(!args.no_gpg_sign)
    .with_names(args.app_name, args.tui_name)
    .with_download_host(args.download_base)
    .with_git_host(args.git_host);

    debug!(repo = %config.repo, tap = %config.tap, dry_run = config.dry_run, "starting tap update");
    let client = build_client()?;
    homebrew::update(&config, &client, &SystemRunner, &ConsoleReporter)
        .await
        .with_context(|| format!("Failed to update Homebrew tap {}", config.tap))
}
