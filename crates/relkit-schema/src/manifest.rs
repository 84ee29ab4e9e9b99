//! The auto-update manifest (`latest.json`) published with each release.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::platform::Platform;

/// Release notes written into every rebuilt manifest.
pub const DEFAULT_NOTES: &str = "See the assets to download this version and install.";

/// Placeholder publish date used when the existing manifest has none.
pub const DEFAULT_PUB_DATE: &str = "2025-01-01T00:00:00.000Z";

/// Download location and detached signature for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    /// Detached signature text, embedded verbatim.
    pub signature: String,
    /// Asset download URL.
    pub url: String,
}

/// Update manifest document.
///
/// Fields the tooling does not own are carried through untouched in
/// [`extra`](Self::extra), and platform entries for keys this crate does not
/// know (e.g. `darwin-universal`) are kept as they were.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateManifest {
    /// Bare release version (no `v` prefix).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Release notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// ISO 8601 publish timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
    /// Platform key to entry.
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformEntry>,
    /// Any other top-level fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UpdateManifest {
    /// An empty manifest with no platforms.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse manifest JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a JSON object of the expected shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if an `extra` value cannot be serialized.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Insert or replace the entry for `platform`.
    pub fn upsert(&mut self, platform: Platform, entry: PlatformEntry) {
        self.platforms.insert(platform.key(), entry);
    }

    /// Look up the entry for `platform`.
    pub fn entry(&self, platform: Platform) -> Option<&PlatformEntry> {
        self.platforms.get(&platform.key())
    }
}
