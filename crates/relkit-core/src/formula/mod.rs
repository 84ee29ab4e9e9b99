//! Text rewriting of Homebrew formula and cask files.
//!
//! Formula files are hand-maintained Ruby. They are never parsed: each
//! strategy is a regex substitution (or a full template render) on raw text,
//! so bytes outside the touched fields stay exactly as they were.

pub mod ordered;
pub mod simple;
pub mod template;

use thiserror::Error;

pub use ordered::{UrlRewrite, replace_sha256_in_order, rewrite_release_urls};
pub use simple::{FieldUpdate, update_fields};
pub use template::{LinuxFormula, formula_class_name};

#[derive(Error, Debug)]
pub enum FormulaError {
    #[error("Invalid formula pattern")]
    Pattern(#[from] regex::Error),

    #[error("Unfilled placeholder in rendered formula: {0}")]
    Placeholder(String),
}
