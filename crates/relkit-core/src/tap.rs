//! Git operations on a Homebrew tap checkout.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::exec::{CommandRunner, CommandSpec, ExecError};

/// Committer name used for tap updates.
pub const BOT_NAME: &str = "github-actions[bot]";
/// Committer email used for tap updates.
pub const BOT_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

/// HTTPS clone URL with the token embedded as the username.
///
/// The token ends up in the process argument list of `git clone`.
pub fn authenticated_clone_url(git_host: &str, tap: &str, token: &str) -> String {
    format!("https://{token}@{git_host}/{tap}.git")
}

/// A cloned tap repository.
#[derive(Debug)]
pub struct TapCheckout<'r, R: CommandRunner + ?Sized> {
    runner: &'r R,
    git: String,
    dir: PathBuf,
}

impl<'r, R: CommandRunner + ?Sized> TapCheckout<'r, R> {
    /// Clone `url` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if `git clone` cannot be run or exits non-zero.
    pub fn clone_into(
        runner: &'r R,
        git: &str,
        url: &str,
        dest: &Path,
    ) -> Result<Self, ExecError> {
        info!(dest = %dest.display(), "cloning tap");
        runner.run_checked(
            &CommandSpec::new(git)
                .arg("clone")
                .arg(url)
                .arg(dest.to_string_lossy()),
        )?;

        Ok(Self {
            runner,
            git: git.to_string(),
            dir: dest.to_path_buf(),
        })
    }

    /// Root of the working tree.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn git<I, S>(&self, args: I) -> Result<(), ExecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.run_checked(
            &CommandSpec::new(&self.git)
                .args(args)
                .current_dir(&self.dir),
        )?;
        Ok(())
    }

    /// Commit exactly `files` as the bot identity and push to upstream.
    ///
    /// With `sign` false the commit is made with `--no-gpg-sign`, overriding
    /// any `commit.gpgsign` setting on the machine.
    ///
    /// # Errors
    ///
    /// Returns the first git step that fails; later steps are not attempted.
    pub fn commit_and_push(&self, files: &[&str], message: &str, sign: bool) -> Result<(), ExecError> {
        self.git(["config", "user.name", BOT_NAME])?;
        self.git(["config", "user.email", BOT_EMAIL])?;

        self.git(std::iter::once("add").chain(files.iter().copied()))?;

        let mut commit = vec!["commit"];
        if !sign {
            commit.push("--no-gpg-sign");
        }
        commit.extend(["-m", message]);
        self.git(commit)?;

        info!(dir = %self.dir.display(), "pushing tap");
        self.git(["push"])
    }
}
