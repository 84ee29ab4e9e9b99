//! Homebrew tap update: hash the release assets, rewrite the three tap files,
//! then commit and push (or preview on a dry run).

use std::collections::HashMap;
use std::path::Path;

use reqwest::Client;
use tracing::info;

use crate::error::ReleaseError;
use crate::exec::CommandRunner;
use crate::formula::{self, FieldUpdate, LinuxFormula, UrlRewrite};
use crate::io::download::{AssetRequest, fetch_and_hash_all};
use crate::reporter::Reporter;
use crate::tap::{TapCheckout, authenticated_clone_url};
use relkit_schema::{GitHubRepo, ReleaseVersion, Sha256Digest};

/// Everything one tap update needs.
#[derive(Debug, Clone)]
pub struct HomebrewConfig {
    /// Source repository the release lives in.
    pub repo: GitHubRepo,
    pub version: ReleaseVersion,
    /// Tap repository to update.
    pub tap: GitHubRepo,
    /// GitHub token used for downloads, clone and push.
    pub token: String,
    pub dry_run: bool,
    /// Leave commit signing to git config; `false` forces `--no-gpg-sign`.
    pub sign_commits: bool,
    /// Desktop app name (`<app>.rb` cask, `<app>-linux.rb` formula).
    pub app_name: String,
    /// Terminal UI name (`<tui>.rb` formula).
    pub tui_name: String,
    /// Scheme and host release assets are downloaded from.
    pub download_host: String,
    /// Host the tap is cloned from.
    pub git_host: String,
    /// `git` executable.
    pub git_program: String,
}

impl HomebrewConfig {
    /// Creates a configuration with GitHub defaults.
    pub fn new(repo: GitHubRepo, version: ReleaseVersion, tap: GitHubRepo, token: impl Into<String>) -> Self {
        Self {
            repo,
            version,
            tap,
            token: token.into(),
            dry_run: false,
            sign_commits: true,
            app_name: "kftray".to_string(),
            tui_name: "kftui".to_string(),
            download_host: "https://github.com".to_string(),
            git_host: "github.com".to_string(),
            git_program: "git".to_string(),
        }
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_sign_commits(mut self, sign: bool) -> Self {
        self.sign_commits = sign;
        self
    }

    #[must_use]
    pub fn with_names(mut self, app: impl Into<String>, tui: impl Into<String>) -> Self {
        self.app_name = app.into();
        self.tui_name = tui.into();
        self
    }

    #[must_use]
    pub fn with_download_host(mut self, host: impl Into<String>) -> Self {
        self.download_host = host.into();
        self
    }

    #[must_use]
    pub fn with_git_host(mut self, host: impl Into<String>) -> Self {
        self.git_host = host.into();
        self
    }

    #[must_use]
    pub fn with_git_program(mut self, git: impl Into<String>) -> Self {
        self.git_program = git.into();
        self
    }

    /// `<host>/<repo>/releases/download/<tag>/`
    pub fn download_base(&self) -> String {
        self.repo
            .release_download_base(&self.download_host, self.version.tag())
    }

    pub fn commit_message(&self) -> String {
        let tag = self.version.tag();
        format!(
            "Update {} to version {tag} and {} to version {tag}",
            self.app_name, self.tui_name
        )
    }

    /// Tap-relative paths of the cask, Linux formula and TUI formula.
    pub fn tap_files(&self) -> TapFiles {
        TapFiles {
            cask: format!("Casks/{}.rb", self.app_name),
            linux_formula: format!("Formula/{}.rb", self.linux_formula_name()),
            tui_formula: format!("Formula/{}.rb", self.tui_name),
        }
    }

    fn linux_formula_name(&self) -> String {
        format!("{}-linux", self.app_name)
    }
}

/// Tap-relative paths of the three managed files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapFiles {
    pub cask: String,
    pub linux_formula: String,
    pub tui_formula: String,
}

impl TapFiles {
    pub fn all(&self) -> [&str; 3] {
        [&self.cask, &self.linux_formula, &self.tui_formula]
    }
}

/// Filenames of the release assets the tap files reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetNames {
    pub app_macos: String,
    pub app_amd64: String,
    pub app_arm64: String,
    pub app_newer_glibc_amd64: String,
    pub app_newer_glibc_arm64: String,
    pub tui_macos: String,
    pub tui_amd64: String,
    pub tui_arm64: String,
}

impl AssetNames {
    pub fn new(app: &str, tui: &str, version: &str) -> Self {
        Self {
            app_macos: format!("{app}_universal.app.tar.gz"),
            app_amd64: format!("{app}_{version}_amd64.AppImage"),
            app_arm64: format!("{app}_{version}_aarch64.AppImage"),
            app_newer_glibc_amd64: format!("{app}_{version}_newer-glibc_amd64.AppImage"),
            app_newer_glibc_arm64: format!("{app}_{version}_newer-glibc_aarch64.AppImage"),
            tui_macos: format!("{tui}_macos_universal"),
            tui_amd64: format!("{tui}_linux_amd64"),
            tui_arm64: format!("{tui}_linux_arm64"),
        }
    }

    pub fn all(&self) -> [&str; 8] {
        [
            &self.app_macos,
            &self.app_amd64,
            &self.app_arm64,
            &self.app_newer_glibc_amd64,
            &self.app_newer_glibc_arm64,
            &self.tui_macos,
            &self.tui_amd64,
            &self.tui_arm64,
        ]
    }
}

/// Filename to digest, as produced by the download pool.
#[derive(Debug, Clone, Default)]
pub struct AssetHashes(HashMap<String, Sha256Digest>);

impl AssetHashes {
    pub fn new(map: HashMap<String, Sha256Digest>) -> Self {
        Self(map)
    }

    /// Digest of `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::MissingAsset`] if it was not downloaded.
    pub fn get(&self, filename: &str) -> Result<&str, ReleaseError> {
        self.0
            .get(filename)
            .map(Sha256Digest::as_str)
            .ok_or_else(|| ReleaseError::MissingAsset(filename.to_string()))
    }
}

/// Run a full tap update.
///
/// Downloads happen before anything touches the tap, so a missing asset
/// leaves the tap repository alone.
///
/// # Errors
///
/// Returns the first download, git or filesystem failure.
pub async fn update<R, P>(
    config: &HomebrewConfig,
    client: &Client,
    runner: &R,
    reporter: &P,
) -> Result<(), ReleaseError>
where
    R: CommandRunner + ?Sized,
    P: Reporter + ?Sized,
{
    let mode = if config.dry_run { "DRY RUN" } else { "LIVE RUN" };
    reporter.section(&format!(
        "[{mode}] Updating homebrew formulas for {} version {}",
        config.repo, config.version
    ));

    let base = config.download_base();
    let names = AssetNames::new(&config.app_name, &config.tui_name, config.version.bare());
    let requests: Vec<AssetRequest> = names
        .all()
        .iter()
        .map(|name| AssetRequest::new(*name, format!("{base}{name}")))
        .collect();

    reporter.section("Downloading and calculating hashes for all assets...");
    let hashes = fetch_and_hash_all(client, &requests, Some(config.token.as_str()), reporter).await?;
    reporter.section("Hashes calculated:");
    for name in names.all() {
        if let Some(digest) = hashes.get(name) {
            reporter.hashed(name, digest);
        }
    }
    let hashes = AssetHashes::new(hashes);

    let workdir = tempfile::tempdir()?;
    let tap_dir = workdir.path().join("homebrew-tap");

    reporter.section("Cloning Homebrew tap...");
    let clone_url = authenticated_clone_url(&config.git_host, config.tap.as_str(), &config.token);
    let tap = TapCheckout::clone_into(runner, &config.git_program, &clone_url, &tap_dir)?;

    reporter.section("Updating formulas...");
    let files = config.tap_files();
    apply_formula_updates(config, tap.path(), &names, &hashes)?;

    if config.dry_run {
        reporter.info("\n[DRY RUN] Showing updated file contents:");
        for file in files.all() {
            let content = read_tap_file(&tap.path().join(file))?;
            reporter.preview(file, &content);
        }
        reporter.info("\n[DRY RUN] Would commit and push changes, but dry run enabled.");
        reporter.info(&format!(
            "[DRY RUN] Commit message would be: {}",
            config.commit_message()
        ));
        reporter.success("Homebrew formulas dry run completed!");
        return Ok(());
    }

    reporter.section("Committing changes...");
    tap.commit_and_push(&files.all(), &config.commit_message(), config.sign_commits)?;
    info!(tap = %config.tap, version = %config.version, "tap updated");

    reporter.success("Homebrew formulas updated successfully!");
    Ok(())
}

fn read_tap_file(path: &Path) -> Result<String, ReleaseError> {
    std::fs::read_to_string(path).map_err(|source| ReleaseError::TapFile {
        path: path.to_path_buf(),
        source,
    })
}

fn write_tap_file(path: &Path, contents: &str) -> Result<(), ReleaseError> {
    std::fs::write(path, contents).map_err(|source| ReleaseError::TapFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Rewrite the cask, Linux formula and TUI formula inside a tap checkout.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, a digest is
/// missing, or a rewrite pattern fails to build.
pub fn apply_formula_updates(
    config: &HomebrewConfig,
    tap_dir: &Path,
    names: &AssetNames,
    hashes: &AssetHashes,
) -> Result<(), ReleaseError> {
    let base = config.download_base();
    let files = config.tap_files();
    let version = config.version.bare();

    // Cask: first-match field substitution.
    let cask_path = tap_dir.join(&files.cask);
    let cask = read_tap_file(&cask_path)?;
    let mac_url = format!("{base}{}", names.app_macos);
    let cask = formula::update_fields(
        &cask,
        &FieldUpdate {
            version: Some(version),
            url: Some(&mac_url),
            sha256: Some(hashes.get(&names.app_macos)?),
        },
    );
    write_tap_file(&cask_path, &cask)?;

    // Linux formula: regenerated from the embedded template.
    let amd64_url = format!("{base}{}", names.app_amd64);
    let arm64_url = format!("{base}{}", names.app_arm64);
    let homepage = format!("https://{}/{}", config.git_host, config.repo);
    let linux = LinuxFormula {
        formula_name: &config.linux_formula_name(),
        app: &config.app_name,
        homepage: &homepage,
        download_base: &base,
        version,
        amd64_url: &amd64_url,
        amd64_sha256: hashes.get(&names.app_amd64)?,
        arm64_url: &arm64_url,
        arm64_sha256: hashes.get(&names.app_arm64)?,
        newer_glibc_amd64_sha256: hashes.get(&names.app_newer_glibc_amd64)?,
        newer_glibc_arm64_sha256: hashes.get(&names.app_newer_glibc_arm64)?,
    }
    .render()?;
    write_tap_file(&tap_dir.join(&files.linux_formula), &linux)?;

    // TUI formula: URL rewrite, then hashes by position (macOS, amd64, arm64).
    let tui_path = tap_dir.join(&files.tui_formula);
    let tui = read_tap_file(&tui_path)?;
    let rewrites: Vec<UrlRewrite> = [&names.tui_macos, &names.tui_amd64, &names.tui_arm64]
        .into_iter()
        .map(|asset| UrlRewrite::new(asset.as_str(), format!("{base}{asset}")))
        .collect();
    let tui = formula::rewrite_release_urls(&tui, config.repo.name(), &rewrites)?;
    let tui = formula::replace_sha256_in_order(
        &tui,
        &[
            hashes.get(&names.tui_macos)?,
            hashes.get(&names.tui_amd64)?,
            hashes.get(&names.tui_arm64)?,
        ],
    );
    write_tap_file(&tui_path, &tui)?;

    Ok(())
}
