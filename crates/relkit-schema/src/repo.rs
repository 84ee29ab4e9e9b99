/// A validated GitHub repository reference in `owner/repo` format.
///
/// # Example
///
/// ```
/// use relkit_schema::GitHubRepo;
///
/// let repo = GitHubRepo::new("hcavarsan/kftray").unwrap();
/// assert_eq!(repo.name(), "kftray");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitHubRepo(String);

impl GitHubRepo {
    /// Create a new `GitHubRepo`, validating the `owner/repo` format.
    ///
    /// # Errors
    ///
    /// Returns an error string if `s` is not in `owner/repo` format or if
    /// either component is empty.
    pub fn new(s: &str) -> Result<Self, String> {
        if let Some((owner, name)) = s.split_once('/') {
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') {
                return Ok(Self(s.to_string()));
            }
        }
        Err(format!(
            "Invalid GitHub repo format: expected 'owner/repo', got '{s}'"
        ))
    }

    /// Get the repo name part.
    pub fn name(&self) -> &str {
        self.0.split('/').nth(1).unwrap_or("")
    }

    /// Return the raw `owner/repo` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base URL release assets of `tag` are served from, with trailing slash.
    ///
    /// `host_base` is the scheme and host, e.g. `https://github.com`.
    pub fn release_download_base(&self, host_base: &str, tag: &str) -> String {
        format!(
            "{}/{}/releases/download/{tag}/",
            host_base.trim_end_matches('/'),
            self.0
        )
    }
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for GitHubRepo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_missing_slash() {
        assert!(GitHubRepo::new("kftray").is_err());
    }

    #[test]
    fn test_rejects_empty_parts_and_nesting() {
        assert!(GitHubRepo::new("/kftray").is_err());
        assert!(GitHubRepo::new("hcavarsan/").is_err());
        assert!(GitHubRepo::new("a/b/c").is_err());
    }

    #[test]
    fn test_release_download_base() {
        let repo = GitHubRepo::new("hcavarsan/kftray").unwrap();
        assert_eq!(
            repo.release_download_base("https://github.com/", "v1.2.3"),
            "https://github.com/hcavarsan/kftray/releases/download/v1.2.3/"
        );
    }
}
