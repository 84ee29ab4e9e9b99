//! Narrow synchronous seam for running external tools (`git`, `gh`).
//!
//! Orchestrators only ever see [`CommandRunner`], so tests can swap in a
//! recording fake and never touch the real binaries.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("'{program}' not found on PATH")]
    NotFound { program: String },

    #[error("Failed to spawn '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Only the program and its first argument are kept so credentials
    /// passed further down the argument list never reach logs.
    #[error("Command failed: {command} (exit code {code:?}): {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// A command to run: program, arguments and optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// `program subcommand`, safe to show in errors.
    pub fn short_name(&self) -> String {
        match self.args.first() {
            Some(first) => format!("{} {first}", self.program),
            None => self.program.clone(),
        }
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner: Send + Sync {
    /// Run `spec` to completion and capture its output.
    ///
    /// A non-zero exit is not an error here; see [`run_checked`](Self::run_checked).
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError>;

    /// Run `spec` and fail on a non-zero exit, carrying its stderr.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Failed`] on a non-zero exit, or the spawn error.
    fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        let output = self.run(spec)?;
        if !output.success() {
            return Err(ExecError::Failed {
                command: spec.short_name(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        (**self).run(spec)
    }
}

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        debug!(command = %spec.short_name(), cwd = ?spec.cwd, "running");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        let output = match cmd.output() {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ExecError::NotFound {
                    program: spec.program.clone(),
                });
            }
            Err(e) => {
                return Err(ExecError::Spawn {
                    program: spec.program.clone(),
                    source: e,
                });
            }
        };

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fake::{FakeRunner, failed_output};
    use super::*;

    #[test]
    fn test_short_name_hides_trailing_args() {
        let spec = CommandSpec::new("git")
            .arg("clone")
            .arg("https://secret@github.com/o/r.git");
        assert_eq!(spec.short_name(), "git clone");
    }

    #[test]
    fn test_run_checked_surfaces_stderr() {
        let runner = FakeRunner::new(|_| failed_output("fatal: repository not found\n"));
        let err = runner
            .run_checked(&CommandSpec::new("git").arg("clone").arg("https://tok@x/y.git"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("git clone"));
        assert!(msg.contains("fatal: repository not found"));
        assert!(!msg.contains("tok@"));
    }

    #[test]
    fn test_system_runner_missing_binary() {
        let err = SystemRunner
            .run(&CommandSpec::new("relkit-definitely-not-a-real-binary"))
            .unwrap_err();
        assert!(matches!(err, ExecError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let out = SystemRunner
            .run(&CommandSpec::new("sh").args(["-c", "echo hi; echo oops >&2; exit 3"]))
            .unwrap();
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout.trim(), "hi");
        assert_eq!(out.stderr.trim(), "oops");
    }
}
