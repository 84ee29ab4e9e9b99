//! Shared types for relkit.
//!
//! Everything here is plain data: digests, repository references, release
//! versions, updater platform keys and the auto-update manifest document.
//! Side effects (network, git, filesystem) live in `relkit-core`.

pub mod hash;
pub mod manifest;
pub mod platform;
pub mod repo;
pub mod version;

// Re-exports
pub use hash::Sha256Digest;
pub use manifest::{DEFAULT_NOTES, DEFAULT_PUB_DATE, PlatformEntry, UpdateManifest};
pub use platform::{GlibcTier, LinuxArch, Platform};
pub use repo::GitHubRepo;
pub use version::ReleaseVersion;
