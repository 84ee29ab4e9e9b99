/// A release version known in both of its spellings.
///
/// Release tags carry a leading `v` (`v0.26.3`) while formula files and the
/// updater manifest want the bare form (`0.26.3`). Either spelling parses.
///
/// # Example
///
/// ```
/// use relkit_schema::ReleaseVersion;
///
/// let v: ReleaseVersion = "0.26.3".parse().unwrap();
/// assert_eq!(v.bare(), "0.26.3");
/// assert_eq!(v.tag(), "v0.26.3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    bare: String,
    tag: String,
}

impl ReleaseVersion {
    /// Parse a version or tag string.
    ///
    /// # Errors
    ///
    /// Returns an error string if nothing is left once leading `v`s are stripped.
    pub fn new(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let bare = s.trim_start_matches('v');
        if bare.is_empty() {
            return Err(format!("Invalid release version: '{s}'"));
        }
        let tag = if s.starts_with('v') {
            s.to_string()
        } else {
            format!("v{s}")
        };
        Ok(Self {
            bare: bare.to_string(),
            tag,
        })
    }

    /// Version without the `v` prefix.
    pub fn bare(&self) -> &str {
        &self.bare
    }

    /// Version as a release tag (`v` prefixed).
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl std::fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag)
    }
}

impl std::str::FromStr for ReleaseVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
