//! Command implementations behind the binaries.

pub mod homebrew;
pub mod manifest;
