//! relkit - release maintenance commands
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! Two post-release jobs, each shipped as its own binary:
//!
//! - `update-homebrew` hashes the published assets of a release and rewrites
//!   the cask and formulas in a Homebrew tap.
//! - `fix-updater-json` rebuilds the Linux entries of the auto-update
//!   manifest from the signatures attached to a release.

pub mod cmd;

use clap::Parser;
use clap::error::ErrorKind;
use relkit_schema::{GitHubRepo, ReleaseVersion};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "update-homebrew")]
#[command(author, about = "Update the Homebrew tap for a published release")]
pub struct HomebrewArgs {
    /// Source repository (owner/name)
    pub repository: GitHubRepo,

    /// Release version, with or without the leading `v`
    #[arg(value_name = "VERSION")]
    pub release_version: ReleaseVersion,

    /// Homebrew tap repository (owner/name)
    pub tap_repository: GitHubRepo,

    /// GitHub token used for downloads, clone and push
    #[arg(value_name = "TOKEN")]
    pub credential: String,

    /// Rewrite and print the files without committing or pushing
    #[arg(long)]
    pub dry_run: bool,

    /// Commit without GPG signing
    #[arg(long)]
    pub no_gpg_sign: bool,

    /// Desktop app name
    #[arg(long, default_value = "kftray")]
    pub app_name: String,

    /// Terminal UI name
    #[arg(long, default_value = "kftui")]
    pub tui_name: String,

    /// Scheme and host release assets are downloaded from
    #[arg(long, env = "RELKIT_DOWNLOAD_BASE", default_value = "https://github.com")]
    pub download_base: String,

    /// Host the tap is cloned from
    #[arg(long, env = "RELKIT_GIT_HOST", default_value = "github.com")]
    pub git_host: String,
}

#[derive(Debug, Parser)]
#[command(name = "fix-updater-json")]
#[command(author, about = "Rebuild the Linux entries of a release's latest.json")]
pub struct ManifestArgs {
    /// Release tag, e.g. v0.26.3
    pub tag: String,

    /// Repository owning the release (owner/name)
    #[arg(long, env = "GITHUB_REPOSITORY", default_value = "hcavarsan/kftray")]
    pub repo: GitHubRepo,

    /// GitHub CLI executable
    #[arg(long, env = "RELKIT_GH", default_value = "gh")]
    pub gh: String,
}

/// Exit code for a failed parse: clap's own for `--help`/`--version`, 1 for
/// every usage error.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit_code(),
        _ => 1,
    }
}

/// Parse the process arguments, printing usage and exiting on failure.
pub fn parse_args<T: Parser>() -> T {
    T::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        std::process::exit(usage_exit_code(&err));
    })
}

/// Install the `RUST_LOG` driven subscriber, logging to stderr.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
