//! Thin wrapper over the `gh release` subcommands used for asset juggling.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::exec::{CommandOutput, CommandRunner, CommandSpec, ExecError};

/// Release asset operations for one tag, run inside a working directory.
#[derive(Debug)]
pub struct GhRelease<'r, R: CommandRunner + ?Sized> {
    runner: &'r R,
    gh: String,
    repo: Option<String>,
    tag: String,
    workdir: PathBuf,
}

impl<'r, R: CommandRunner + ?Sized> GhRelease<'r, R> {
    pub fn new(runner: &'r R, gh: &str, tag: &str, workdir: &Path) -> Self {
        Self {
            runner,
            gh: gh.to_string(),
            repo: None,
            tag: tag.to_string(),
            workdir: workdir.to_path_buf(),
        }
    }

    /// Target `owner/repo` explicitly instead of the repository `gh` infers.
    #[must_use]
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    fn spec(&self, action: &str) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.gh)
            .args(["release", action, self.tag.as_str()])
            .current_dir(&self.workdir);
        if let Some(repo) = &self.repo {
            spec = spec.args(["--repo", repo.as_str()]);
        }
        spec
    }

    /// `gh release download <tag> -p <pattern>`, returning the raw output
    /// whether or not it succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error only if `gh` cannot be spawned.
    pub fn try_download(&self, pattern: &str) -> Result<CommandOutput, ExecError> {
        debug!(tag = %self.tag, pattern, "downloading release assets");
        self.runner.run(&self.spec("download").args(["-p", pattern]))
    }

    /// Download every asset matching `pattern` into the working directory.
    ///
    /// # Errors
    ///
    /// Fails if nothing matches or `gh` exits non-zero.
    pub fn download(&self, pattern: &str) -> Result<(), ExecError> {
        debug!(tag = %self.tag, pattern, "downloading release assets");
        self.runner
            .run_checked(&self.spec("download").args(["-p", pattern]))?;
        Ok(())
    }

    /// Download the single asset `name` and save it as `output`, replacing
    /// any existing file.
    ///
    /// # Errors
    ///
    /// Fails if `gh` exits non-zero.
    pub fn download_as(&self, name: &str, output: &str) -> Result<(), ExecError> {
        self.runner.run_checked(
            &self
                .spec("download")
                .args(["-p", name, "-O", output, "--clobber"]),
        )?;
        Ok(())
    }

    /// Upload `file`, overwriting an existing asset of the same name.
    ///
    /// # Errors
    ///
    /// Fails if `gh` exits non-zero.
    pub fn upload_clobber(&self, file: &str) -> Result<(), ExecError> {
        debug!(tag = %self.tag, file, "uploading release asset");
        self.runner
            .run_checked(&self.spec("upload").args([file, "--clobber"]))?;
        Ok(())
    }

    /// Delete asset `name` from the release.
    ///
    /// # Errors
    ///
    /// Fails if `gh` exits non-zero.
    pub fn delete_asset(&self, name: &str) -> Result<(), ExecError> {
        self.runner
            .run_checked(&self.spec("delete-asset").args([name, "--yes"]))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::fake::{FakeRunner, failed_output};

    #[test]
    fn test_command_lines() {
        let runner = FakeRunner::ok();
        let gh = GhRelease::new(&runner, "gh", "v1.0.0", Path::new("/tmp/rel"));
        gh.download("*.AppImage.sig").unwrap();
        gh.upload_clobber("latest_fixed.json").unwrap();
        gh.download_as("latest_fixed.json", "latest.json").unwrap();
        gh.delete_asset("latest_fixed.json").unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![
                "gh release download v1.0.0 -p *.AppImage.sig",
                "gh release upload v1.0.0 latest_fixed.json --clobber",
                "gh release download v1.0.0 -p latest_fixed.json -O latest.json --clobber",
                "gh release delete-asset v1.0.0 latest_fixed.json --yes",
            ]
        );
        assert!(
            runner
                .calls()
                .iter()
                .all(|c| c.cwd.as_deref() == Some(Path::new("/tmp/rel")))
        );
    }

    #[test]
    fn test_repo_flag() {
        let runner = FakeRunner::ok();
        GhRelease::new(&runner, "gh", "v1.0.0", Path::new("/tmp"))
            .with_repo("hcavarsan/kftray")
            .delete_asset("x.json")
            .unwrap();
        assert_eq!(
            runner.command_lines(),
            vec!["gh release delete-asset v1.0.0 --repo hcavarsan/kftray x.json --yes"]
        );
    }

    #[test]
    fn test_try_download_reports_failure_without_error() {
        let runner = FakeRunner::new(|_| failed_output("no assets match the file pattern"));
        let gh = GhRelease::new(&runner, "gh", "v1.0.0", Path::new("/tmp"));
        let out = gh.try_download("latest.json").unwrap();
        assert!(!out.success());
        assert!(gh.download("*.AppImage.sig").is_err());
    }
}
