use regex::{Captures, NoExpand, Regex};

use super::FormulaError;
use super::simple::SHA256_FIELD;

/// Point every download URL for `asset` at `new_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRewrite {
    pub asset: String,
    pub new_url: String,
}

impl UrlRewrite {
    pub fn new(asset: impl Into<String>, new_url: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            new_url: new_url.into(),
        }
    }
}

/// Rewrite release download URLs of `repo_name`.
///
/// URLs match on the stable suffix
/// `/<repo_name>/releases/download/v<tag>/<asset>`; host and owner may be
/// anything, so a transferred repository is still picked up.
///
/// # Errors
///
/// Returns [`FormulaError::Pattern`] if the generated pattern does not compile.
pub fn rewrite_release_urls(
    content: &str,
    repo_name: &str,
    rewrites: &[UrlRewrite],
) -> Result<String, FormulaError> {
    let mut out = content.to_string();
    for rewrite in rewrites {
        let pattern = format!(
            r#"https://[^/\s"]+/[^/\s"]+/{}/releases/download/v[^/\s"]+/{}"#,
            regex::escape(repo_name),
            regex::escape(&rewrite.asset),
        );
        let re = Regex::new(&pattern)?;
        out = re
            .replace_all(&out, NoExpand(rewrite.new_url.as_str()))
            .into_owned();
    }
    Ok(out)
}

/// Replace `sha256 "..."` stanzas by position.
///
/// The Nth occurrence in the file receives `hashes[N]`; occurrences past the
/// end of `hashes` are left as they are. Nothing checks that the Nth stanza
/// actually belongs to the Nth asset, so reordering blocks in the formula
/// silently mismatches hashes.
///
/// # Example
///
/// ```
/// use relkit_core::formula::replace_sha256_in_order;
///
/// let f = "sha256 \"a\"\nsha256 \"b\"\nsha256 \"c\"\n";
/// assert_eq!(replace_sha256_in_order(f, &["1", "2"]), "sha256 \"1\"\nsha256 \"2\"\nsha256 \"c\"\n");
/// ```
pub fn replace_sha256_in_order(content: &str, hashes: &[&str]) -> String {
    let mut next = 0;
    SHA256_FIELD
        .replace_all(content, |caps: &Captures<'_>| {
            if let Some(hash) = hashes.get(next) {
                next += 1;
                format!(r#"sha256 "{hash}""#)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
