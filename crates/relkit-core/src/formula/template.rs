//! Full regeneration of the Linux `AppImage` formula.
//!
//! This file owns the whole formula body, so upstream edits to the tap copy
//! are overwritten on every release. Changes to the install logic belong in
//! `templates/linux-formula.rb`.

use super::FormulaError;

const LINUX_FORMULA_TEMPLATE: &str = include_str!("../../templates/linux-formula.rb");

/// Values substituted into the Linux formula template.
#[derive(Debug, Clone, Copy)]
pub struct LinuxFormula<'a> {
    /// Formula file stem, e.g. `kftray-linux`.
    pub formula_name: &'a str,
    /// Application binary name, e.g. `kftray`.
    pub app: &'a str,
    pub homepage: &'a str,
    /// Release download base ending in `/`.
    pub download_base: &'a str,
    /// Bare version.
    pub version: &'a str,
    pub amd64_url: &'a str,
    pub amd64_sha256: &'a str,
    pub arm64_url: &'a str,
    pub arm64_sha256: &'a str,
    pub newer_glibc_amd64_sha256: &'a str,
    pub newer_glibc_arm64_sha256: &'a str,
}

impl LinuxFormula<'_> {
    /// Render the formula.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::Placeholder`] if a `{{TOKEN}}` survives rendering.
    pub fn render(&self) -> Result<String, FormulaError> {
        let class_name = formula_class_name(self.formula_name);
        let substitutions = [
            ("{{CLASS_NAME}}", class_name.as_str()),
            ("{{APP}}", self.app),
            ("{{HOMEPAGE}}", self.homepage),
            ("{{DOWNLOAD_BASE}}", self.download_base),
            ("{{VERSION}}", self.version),
            ("{{AMD64_URL}}", self.amd64_url),
            ("{{AMD64_SHA256}}", self.amd64_sha256),
            ("{{ARM64_URL}}", self.arm64_url),
            ("{{ARM64_SHA256}}", self.arm64_sha256),
            ("{{NEWER_GLIBC_AMD64_SHA256}}", self.newer_glibc_amd64_sha256),
            ("{{NEWER_GLIBC_ARM64_SHA256}}", self.newer_glibc_arm64_sha256),
        ];

        let rendered = substitutions
            .iter()
            .fold(LINUX_FORMULA_TEMPLATE.to_string(), |acc, (token, value)| {
                acc.replace(token, value)
            });

        if let Some(start) = rendered.find("{{") {
            let token: String = rendered[start..].chars().take_while(|c| *c != '\n').collect();
            return Err(FormulaError::Placeholder(token));
        }

        Ok(rendered)
    }
}

/// Homebrew class name for a formula file stem (`kftray-linux` -> `KftrayLinux`).
pub fn formula_class_name(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
