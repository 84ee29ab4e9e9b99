//! Repair the auto-update manifest attached to a release.
//!
//! The release pipeline uploads `latest.json` plus one detached signature per
//! Linux `AppImage`. This module rebuilds the manifest's Linux platform entries
//! from those signatures and republishes it under the same asset name.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::error::ReleaseError;
use crate::exec::CommandRunner;
use crate::release::GhRelease;
use crate::reporter::Reporter;
use relkit_schema::{DEFAULT_NOTES, DEFAULT_PUB_DATE, GitHubRepo, Platform, PlatformEntry, UpdateManifest};

/// Manifest asset name on the release.
pub const MANIFEST_ASSET: &str = "latest.json";
/// Temporary asset name used while republishing.
pub const FIXED_ASSET: &str = "latest_fixed.json";
/// Glob matching the Linux bundle signatures.
pub const SIGNATURE_PATTERN: &str = "*.AppImage.sig";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to parse {MANIFEST_ASSET}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to serialize manifest")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid signature pattern")]
    Pattern(#[from] glob::PatternError),
}

/// Settings for one manifest repair.
#[derive(Debug, Clone)]
pub struct ManifestFixConfig {
    /// Release tag as published (usually `v`-prefixed).
    pub tag: String,
    /// Repository owning the release.
    pub repo: GitHubRepo,
    /// Scheme and host used to build asset URLs.
    pub download_host: String,
    /// Release CLI executable.
    pub gh_program: String,
}

impl ManifestFixConfig {
    pub fn new(tag: impl Into<String>, repo: GitHubRepo) -> Self {
        Self {
            tag: tag.into(),
            repo,
            download_host: "https://github.com".to_string(),
            gh_program: "gh".to_string(),
        }
    }

    #[must_use]
    pub fn with_gh_program(mut self, gh: impl Into<String>) -> Self {
        self.gh_program = gh.into();
        self
    }

    #[must_use]
    pub fn with_download_host(mut self, host: impl Into<String>) -> Self {
        self.download_host = host.into();
        self
    }

    /// Tag with every leading `v` removed.
    pub fn bare_version(&self) -> &str {
        self.tag.trim_start_matches('v')
    }

    fn asset_url(&self, asset: &str) -> String {
        format!(
            "{}{asset}",
            self.repo.release_download_base(&self.download_host, &self.tag)
        )
    }
}

/// A bundle signature found next to the release assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAsset {
    /// Bundle filename, i.e. the signature filename without `.sig`.
    pub asset: String,
    /// Trimmed signature text; `None` if unreadable or blank.
    pub signature: Option<String>,
}

impl SignedAsset {
    /// Build from a signature filename and its raw contents.
    pub fn from_signature_file(filename: &str, contents: Option<&str>) -> Self {
        let asset = filename.strip_suffix(".sig").unwrap_or(filename).to_string();
        let signature = contents
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { asset, signature }
    }
}

/// Read every `*.AppImage.sig` in `dir`, sorted by filename.
///
/// # Errors
///
/// Returns an error only if the glob pattern cannot be built.
pub fn collect_signatures(dir: &Path) -> Result<Vec<SignedAsset>, ManifestError> {
    let pattern = format!(
        "{}/{SIGNATURE_PATTERN}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );

    let mut paths: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(Result::ok).collect();
    paths.sort();

    Ok(paths
        .iter()
        .filter_map(|path| {
            let filename = path.file_name()?.to_str()?;
            let contents = std::fs::read_to_string(path).ok();
            Some(SignedAsset::from_signature_file(filename, contents.as_deref()))
        })
        .collect())
}

/// Rewrite `manifest` for the release described by `config`.
///
/// Sets the version and notes, keeps an existing `pub_date`, and upserts one
/// platform entry per signed asset that maps to a known platform. Entries the
/// signatures do not cover are left as they were.
pub fn rebuild<P: Reporter + ?Sized>(
    mut manifest: UpdateManifest,
    config: &ManifestFixConfig,
    signatures: &[SignedAsset],
    reporter: &P,
) -> UpdateManifest {
    manifest.version = Some(config.bare_version().to_string());
    manifest.notes = Some(DEFAULT_NOTES.to_string());
    if manifest.pub_date.is_none() {
        manifest.pub_date = Some(DEFAULT_PUB_DATE.to_string());
    }

    for signed in signatures {
        let Some(platform) = Platform::from_asset_name(&signed.asset) else {
            debug!(asset = %signed.asset, "no platform for asset");
            continue;
        };

        let Some(signature) = &signed.signature else {
            reporter.warning(&format!(
                "Signature for {} is missing or empty, skipping {platform}",
                signed.asset
            ));
            continue;
        };

        let url = config.asset_url(&signed.asset);
        reporter.info(&format!("{platform}: {url}"));
        manifest.upsert(
            platform,
            PlatformEntry {
                signature: signature.clone(),
                url,
            },
        );
    }

    manifest
}

fn list_dir(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

/// Download, rebuild and republish the manifest of `config.tag`.
///
/// Work happens in a scratch directory that is removed on return; the
/// process working directory is not touched. Returns the published manifest.
///
/// # Errors
///
/// Fails if the signatures cannot be downloaded, an existing manifest is not
/// valid JSON, or any publish step fails.
pub fn fix<R, P>(config: &ManifestFixConfig, runner: &R, reporter: &P) -> Result<UpdateManifest, ReleaseError>
where
    R: CommandRunner + ?Sized,
    P: Reporter + ?Sized,
{
    reporter.section(&format!("Fixing updater manifest for {}", config.tag));

    let workdir = tempfile::tempdir()?;
    let gh = GhRelease::new(runner, &config.gh_program, &config.tag, workdir.path())
        .with_repo(config.repo.as_str());

    let manifest_path = workdir.path().join(MANIFEST_ASSET);
    let fetched = gh.try_download(MANIFEST_ASSET)?;
    let manifest = if fetched.success() && manifest_path.exists() {
        let raw = std::fs::read_to_string(&manifest_path)?;
        UpdateManifest::from_json(&raw).map_err(ManifestError::Parse)?
    } else {
        reporter.warning(&format!(
            "Could not download {MANIFEST_ASSET} ({}), starting from an empty manifest",
            fetched.stderr.trim()
        ));
        UpdateManifest::empty()
    };

    gh.download(SIGNATURE_PATTERN)?;
    reporter.info(&format!("Downloaded files: {}", list_dir(workdir.path())?.join(", ")));

    let signatures = collect_signatures(workdir.path())?;
    let manifest = rebuild(manifest, config, &signatures, reporter);

    let json = manifest.to_json_pretty().map_err(ManifestError::Serialize)?;
    std::fs::write(workdir.path().join(FIXED_ASSET), &json)?;
    reporter.preview(FIXED_ASSET, &json);

    reporter.section("Publishing fixed manifest...");
    gh.upload_clobber(FIXED_ASSET)?;
    gh.download_as(FIXED_ASSET, MANIFEST_ASSET)?;
    gh.upload_clobber(MANIFEST_ASSET)?;
    gh.delete_asset(FIXED_ASSET)?;

    info!(tag = %config.tag, platforms = manifest.platforms.len(), "manifest republished");
    reporter.success(&format!("{MANIFEST_ASSET} updated for {}", config.tag));
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandSpec;
    use crate::exec::fake::{FakeRunner, failed_output, ok_output};
    use crate::reporter::NullReporter;
    use crate::reporter::recording::RecordingReporter;
    use relkit_schema::{GlibcTier, LinuxArch};

    fn config() -> ManifestFixConfig {
        ManifestFixConfig::new("v1.2.3", "hcavarsan/kftray".parse().unwrap())
    }

    fn signed(asset: &str, sig: &str) -> SignedAsset {
        SignedAsset {
            asset: asset.to_string(),
            signature: Some(sig.to_string()),
        }
    }

    fn pattern_of(spec: &CommandSpec) -> Option<&str> {
        let at = spec.args.iter().position(|a| a == "-p")?;
        spec.args.get(at + 1).map(String::as_str)
    }

    /// Answers `gh` like a release holding the given manifest and signatures.
    fn release_runner(manifest: Option<&'static str>, sigs: &'static [(&'static str, &'static str)]) -> FakeRunner {
        FakeRunner::new(move |spec| {
            let dir = spec.cwd.clone().unwrap();
            let is_download = spec.args.get(1).map(String::as_str) == Some("download");
            match (is_download, pattern_of(spec)) {
                (true, Some(MANIFEST_ASSET)) => match manifest {
                    Some(body) => {
                        std::fs::write(dir.join(MANIFEST_ASSET), body).unwrap();
                        ok_output()
                    }
                    None => failed_output("release asset not found"),
                },
                (true, Some(SIGNATURE_PATTERN)) => {
                    for (name, body) in sigs {
                        std::fs::write(dir.join(name), body).unwrap();
                    }
                    ok_output()
                }
                _ => ok_output(),
            }
        })
    }

    #[test]
    fn test_signed_asset_strips_suffix_and_trims() {
        let s = SignedAsset::from_signature_file("a_amd64.AppImage.sig", Some("  sig\n"));
        assert_eq!(s.asset, "a_amd64.AppImage");
        assert_eq!(s.signature.as_deref(), Some("sig"));

        let blank = SignedAsset::from_signature_file("a.AppImage.sig", Some(" \n"));
        assert_eq!(blank.signature, None);
    }

    #[test]
    fn test_rebuild_maps_default_glibc_assets() {
        let sigs = [
            signed("app_1.2.3_amd64.AppImage", "SIG_A"),
            signed("app_1.2.3_aarch64.AppImage", "SIG_B"),
        ];
        let m = rebuild(UpdateManifest::empty(), &config(), &sigs, &NullReporter);

        assert_eq!(m.version.as_deref(), Some("1.2.3"));
        assert_eq!(m.notes.as_deref(), Some(DEFAULT_NOTES));
        assert_eq!(m.pub_date.as_deref(), Some(DEFAULT_PUB_DATE));
        assert_eq!(
            m.platforms.keys().collect::<Vec<_>>(),
            vec!["linux-aarch64-glibc231", "linux-x86_64-glibc231"]
        );
        let x86 = &m.platforms["linux-x86_64-glibc231"];
        assert_eq!(x86.signature, "SIG_A");
        assert_eq!(
            x86.url,
            "https://github.com/hcavarsan/kftray/releases/download/v1.2.3/app_1.2.3_amd64.AppImage"
        );
        assert_eq!(
            m.platforms["linux-aarch64-glibc231"].url,
            "https://github.com/hcavarsan/kftray/releases/download/v1.2.3/app_1.2.3_aarch64.AppImage"
        );
    }

    #[test]
    fn test_rebuild_newer_glibc_and_unknown_arch() {
        let sigs = [
            signed("kftray_1.2.3_newer-glibc_arm64.AppImage", "N"),
            signed("kftray_1.2.3_universal.AppImage", "U"),
        ];
        let m = rebuild(UpdateManifest::empty(), &config(), &sigs, &NullReporter);

        assert_eq!(m.platforms.len(), 1);
        let p = Platform::new(LinuxArch::Aarch64, GlibcTier::Glibc239);
        assert_eq!(m.entry(p).unwrap().signature, "N");
    }

    #[test]
    fn test_rebuild_keeps_existing_fields() {
        let existing = UpdateManifest::from_json(
            r#"{
                "version": "1.2.2",
                "notes": "old",
                "pub_date": "2024-06-01T12:00:00Z",
                "platforms": {
                    "darwin-universal": {"signature": "D", "url": "https://x/app.tar.gz"},
                    "linux-x86_64-glibc231": {"signature": "OLD", "url": "https://x/old"}
                }
            }"#,
        )
        .unwrap();
        let sigs = [signed("app_amd64.AppImage", "NEW")];
        let m = rebuild(existing, &config(), &sigs, &NullReporter);

        assert_eq!(m.pub_date.as_deref(), Some("2024-06-01T12:00:00Z"));
        assert_eq!(m.notes.as_deref(), Some(DEFAULT_NOTES));
        assert_eq!(m.platforms["darwin-universal"].signature, "D");
        assert_eq!(m.platforms["linux-x86_64-glibc231"].signature, "NEW");
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let sigs = [
            signed("app_x86_64.AppImage", "A"),
            signed("app_newer-glibc_amd64.AppImage", "B"),
        ];
        let once = rebuild(UpdateManifest::empty(), &config(), &sigs, &NullReporter);
        let twice = rebuild(once.clone(), &config(), &sigs, &NullReporter);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rebuild_skips_blank_signature_with_warning() {
        let reporter = RecordingReporter::default();
        let sigs = [SignedAsset::from_signature_file("app_amd64.AppImage.sig", Some(""))];
        let m = rebuild(UpdateManifest::empty(), &config(), &sigs, &reporter);

        assert!(m.platforms.is_empty());
        assert_eq!(reporter.warnings().len(), 1);
        assert!(reporter.warnings()[0].contains("app_amd64.AppImage"));
    }

    #[test]
    fn test_collect_signatures_reads_only_appimage_sigs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_arm64.AppImage.sig"), "B\n").unwrap();
        std::fs::write(dir.path().join("a_amd64.AppImage.sig"), "A").unwrap();
        std::fs::write(dir.path().join("app.tar.gz.sig"), "X").unwrap();

        let sigs = collect_signatures(dir.path()).unwrap();
        assert_eq!(
            sigs,
            vec![signed("a_amd64.AppImage", "A"), signed("b_arm64.AppImage", "B")]
        );
    }

    #[test]
    fn test_fix_publishes_in_order() {
        let runner = release_runner(
            Some(r#"{"platforms": {}}"#),
            &[("app_1.2.3_amd64.AppImage.sig", "SIG_A")],
        );
        let reporter = RecordingReporter::default();
        let m = fix(&config(), &runner, &reporter).unwrap();

        assert_eq!(m.platforms["linux-x86_64-glibc231"].signature, "SIG_A");
        assert_eq!(
            runner.command_lines(),
            vec![
                "gh release download v1.2.3 --repo hcavarsan/kftray -p latest.json",
                "gh release download v1.2.3 --repo hcavarsan/kftray -p *.AppImage.sig",
                "gh release upload v1.2.3 --repo hcavarsan/kftray latest_fixed.json --clobber",
                "gh release download v1.2.3 --repo hcavarsan/kftray -p latest_fixed.json -O latest.json --clobber",
                "gh release upload v1.2.3 --repo hcavarsan/kftray latest.json --clobber",
                "gh release delete-asset v1.2.3 --repo hcavarsan/kftray latest_fixed.json --yes",
            ]
        );

        let previews = reporter.previews();
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].0, FIXED_ASSET);
        assert!(previews[0].1.contains("\"version\": \"1.2.3\""));
    }

    #[test]
    fn test_fix_without_manifest_starts_empty() {
        let runner = release_runner(None, &[("app_aarch64.AppImage.sig", "S")]);
        let reporter = RecordingReporter::default();
        let m = fix(&config(), &runner, &reporter).unwrap();

        assert_eq!(m.platforms.keys().collect::<Vec<_>>(), vec!["linux-aarch64-glibc231"]);
        assert!(reporter.warnings().iter().any(|w| w.contains(MANIFEST_ASSET)));
    }

    #[test]
    fn test_fix_fails_when_signatures_unavailable() {
        let runner = FakeRunner::new(|spec| {
            if pattern_of(spec) == Some(SIGNATURE_PATTERN) {
                failed_output("no assets match the file pattern")
            } else {
                ok_output()
            }
        });
        let err = fix(&config(), &runner, &NullReporter).unwrap_err();

        assert!(err.to_string().contains("no assets match"));
        assert!(!runner.command_lines().iter().any(|l| l.contains("upload")));
    }

    #[test]
    fn test_fix_rejects_corrupt_manifest() {
        let runner = release_runner(Some("{not json"), &[]);
        let err = fix(&config(), &runner, &NullReporter).unwrap_err();
        assert!(matches!(err, ReleaseError::Manifest(ManifestError::Parse(_))));
    }
}
