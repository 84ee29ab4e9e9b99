//! Core library for relkit: release asset hashing, Homebrew tap updates and
//! auto-update manifest repair.

pub mod error;
pub mod exec;
pub mod formula;
pub mod homebrew;
pub mod io;
pub mod release;
pub mod reporter;
pub mod tap;
pub mod updater_manifest;

pub use error::ReleaseError;
pub use exec::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use reporter::{ConsoleReporter, NullReporter, Reporter};

/// User Agent string for release asset downloads
pub const USER_AGENT: &str = concat!("relkit/", env!("CARGO_PKG_VERSION"));
