//! Domain-specific errors for release maintenance operations

use crate::exec::ExecError;
use crate::formula::FormulaError;
use crate::io::download::DownloadError;
use crate::updater_manifest::ManifestError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Cannot access tap file {}", path.display())]
    TapFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Asset was not downloaded: {0}")]
    MissingAsset(String),
}
