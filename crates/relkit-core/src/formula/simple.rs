use std::sync::LazyLock;

use regex::{NoExpand, Regex};

static VERSION_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"version\s+"[^"]+""#).expect("valid version pattern"));
static URL_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\s+"[^"]+""#).expect("valid url pattern"));
pub(crate) static SHA256_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"sha256\s+"[^"]+""#).expect("valid sha256 pattern"));

/// New values for the `version`, `url` and `sha256` stanzas. `None` leaves
/// the field alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldUpdate<'a> {
    pub version: Option<&'a str>,
    pub url: Option<&'a str>,
    pub sha256: Option<&'a str>,
}

/// Replace the first `version "..."`, `url "..."` and `sha256 "..."` in
/// `content`. Later occurrences and all other bytes are untouched.
///
/// # Example
///
/// ```
/// use relkit_core::formula::{FieldUpdate, update_fields};
///
/// let cask = "cask \"app\" do\n  version \"1.0.0\"\n  sha256 \"aaa\"\nend\n";
/// let out = update_fields(cask, &FieldUpdate { version: Some("2.0.0"), sha256: Some("bbb"), ..Default::default() });
/// assert_eq!(out, "cask \"app\" do\n  version \"2.0.0\"\n  sha256 \"bbb\"\nend\n");
/// ```
pub fn update_fields(content: &str, update: &FieldUpdate<'_>) -> String {
    let mut out = content.to_string();

    if let Some(version) = update.version {
        out = replace_first(&VERSION_FIELD, &out, &format!(r#"version "{version}""#));
    }
    if let Some(url) = update.url {
        out = replace_first(&URL_FIELD, &out, &format!(r#"url "{url}""#));
    }
    if let Some(sha256) = update.sha256 {
        out = replace_first(&SHA256_FIELD, &out, &format!(r#"sha256 "{sha256}""#));
    }

    out
}

fn replace_first(re: &Regex, haystack: &str, replacement: &str) -> String {
    re.replacen(haystack, 1, NoExpand(replacement)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASK: &str = r#"cask "kftray" do
  version "0.26.2"
  sha256 "1111111111111111111111111111111111111111111111111111111111111111"

  url "https://github.com/hcavarsan/kftray/releases/download/v0.26.2/kftray_universal.app.tar.gz"
  name "kftray"

  livecheck do
    url "https://github.com/hcavarsan/kftray/releases/latest"
  end

  app "kftray.app"
end
"#;

    #[test]
    fn test_replaces_only_first_occurrence() {
        let out = update_fields(
            CASK,
            &FieldUpdate {
                version: Some("0.27.0"),
                url: Some("https://example.com/new.tar.gz"),
                sha256: Some("abcd"),
            },
        );

        assert!(out.contains(r#"version "0.27.0""#));
        assert!(out.contains(r#"sha256 "abcd""#));
        assert!(out.contains(r#"  url "https://example.com/new.tar.gz""#));
        // livecheck url is the second match and must survive
        assert!(out.contains(r#"url "https://github.com/hcavarsan/kftray/releases/latest""#));
        assert!(!out.contains("0.26.2"));
    }

    #[test]
    fn test_other_bytes_untouched() {
        let out = update_fields(
            CASK,
            &FieldUpdate {
                version: Some("0.26.2"),
                url: Some(
                    "https://github.com/hcavarsan/kftray/releases/download/v0.26.2/kftray_universal.app.tar.gz",
                ),
                sha256: Some("1111111111111111111111111111111111111111111111111111111111111111"),
            },
        );
        assert_eq!(out, CASK);
    }

    #[test]
    fn test_none_fields_skipped() {
        let out = update_fields(CASK, &FieldUpdate::default());
        assert_eq!(out, CASK);
    }

    #[test]
    fn test_replacement_is_literal() {
        let out = update_fields(
            "version \"1\"",
            &FieldUpdate {
                version: Some("$1${x}"),
                ..FieldUpdate::default()
            },
        );
        assert_eq!(out, "version \"$1${x}\"");
    }

    #[test]
    fn test_tolerates_extra_whitespace() {
        let out = update_fields(
            "  version   \"1.0\"\n",
            &FieldUpdate {
                version: Some("2.0"),
                ..FieldUpdate::default()
            },
        );
        assert_eq!(out, "  version \"2.0\"\n");
    }
}
