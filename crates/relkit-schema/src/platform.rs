//! Updater platform keys for Linux `AppImage` builds.
//!
//! Linux bundles are published for two CPU architectures and two glibc
//! baselines. The updater identifies each combination by a key such as
//! `linux-x86_64-glibc231`, which is derived purely from the asset filename.

/// Substring marking a build linked against the newer glibc baseline.
pub const NEWER_GLIBC_MARKER: &str = "newer-glibc";

/// CPU architecture of a Linux asset.
///
/// `amd64`/`x86_64` are treated as equivalent, as are `aarch64`/`arm64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinuxArch {
    /// Intel/AMD 64-bit.
    X86_64,
    /// ARM 64-bit.
    Aarch64,
}

impl LinuxArch {
    /// Detect the architecture from an asset filename.
    ///
    /// The x86 tokens are checked first, so a name carrying both spellings
    /// resolves to `X86_64`.
    pub fn from_asset_name(name: &str) -> Option<Self> {
        if name.contains("amd64") || name.contains("x86_64") {
            Some(Self::X86_64)
        } else if name.contains("aarch64") || name.contains("arm64") {
            Some(Self::Aarch64)
        } else {
            None
        }
    }

    /// Name used inside updater platform keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }
}

impl std::fmt::Display for LinuxArch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimum glibc version a Linux asset was built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlibcTier {
    /// glibc 2.31 baseline (default builds).
    Glibc231,
    /// glibc 2.39 baseline (`newer-glibc` builds).
    Glibc239,
}

impl GlibcTier {
    /// Select the tier from an asset filename.
    pub fn from_asset_name(name: &str) -> Self {
        if name.contains(NEWER_GLIBC_MARKER) {
            Self::Glibc239
        } else {
            Self::Glibc231
        }
    }

    /// Numeric suffix used in updater platform keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Glibc231 => "231",
            Self::Glibc239 => "239",
        }
    }
}

/// A resolved updater platform.
///
/// # Example
///
/// ```
/// use relkit_schema::Platform;
///
/// let p = Platform::from_asset_name("kftray_0.26.3_newer-glibc_amd64.AppImage").unwrap();
/// assert_eq!(p.key(), "linux-x86_64-glibc239");
/// assert!(Platform::from_asset_name("kftray_universal.app.tar.gz").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Platform {
    /// CPU architecture.
    pub arch: LinuxArch,
    /// glibc baseline.
    pub tier: GlibcTier,
}

impl Platform {
    /// All platforms the updater manifest knows about.
    pub const ALL: [Self; 4] = [
        Self::new(LinuxArch::X86_64, GlibcTier::Glibc231),
        Self::new(LinuxArch::Aarch64, GlibcTier::Glibc231),
        Self::new(LinuxArch::X86_64, GlibcTier::Glibc239),
        Self::new(LinuxArch::Aarch64, GlibcTier::Glibc239),
    ];

    /// Create a platform from its parts.
    pub const fn new(arch: LinuxArch, tier: GlibcTier) -> Self {
        Self { arch, tier }
    }

    /// Map an asset filename to its platform.
    ///
    /// Returns `None` when no architecture token is present; such assets are
    /// not part of the updater manifest.
    pub fn from_asset_name(name: &str) -> Option<Self> {
        let arch = LinuxArch::from_asset_name(name)?;
        Some(Self::new(arch, GlibcTier::from_asset_name(name)))
    }

    /// Manifest key, e.g. `linux-aarch64-glibc231`.
    pub fn key(&self) -> String {
        format!("linux-{}-glibc{}", self.arch.as_str(), self.tier.as_str())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
