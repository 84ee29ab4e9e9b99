//! Streaming download with SHA256 hashing, plus a bounded parallel pool.
//!
//! Asset bodies are hashed chunk by chunk as they arrive and never written
//! to disk or buffered whole.

use std::collections::HashMap;

use futures::{StreamExt, TryStreamExt, stream};
use reqwest::Client;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use crate::Reporter;
use relkit_schema::Sha256Digest;

/// Maximum number of asset downloads in flight at once.
pub const MAX_PARALLEL_DOWNLOADS: usize = 4;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Build the HTTP client used for release asset downloads.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client() -> Result<Client, DownloadError> {
    Client::builder()
        .user_agent(crate::USER_AGENT)
        .build()
        .map_err(|e| DownloadError::Client(e.to_string()))
}

/// A single asset to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    /// Asset filename, used as the result key.
    pub filename: String,
    /// Full download URL.
    pub url: String,
}

impl AssetRequest {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
        }
    }
}

/// Download one asset and return its SHA256 digest.
///
/// Sends `Authorization: Bearer <token>` when a token is given. Any non-2xx
/// status is an error.
///
/// # Errors
///
/// Returns [`DownloadError::Http`] on connection failure, a non-success
/// status, or a broken body stream.
pub async fn fetch_and_hash<R: Reporter + ?Sized>(
    client: &Client,
    url: &str,
    token: Option<&str>,
    reporter: &R,
) -> Result<Sha256Digest, DownloadError> {
    reporter.downloading(url);

    let mut request = client.get(url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?.error_for_status()?;

    let mut stream = response.bytes_stream();
    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
    }

    let digest = Sha256Digest::from_bytes(&hasher.finalize().into());
    debug!(url, bytes = downloaded, %digest, "asset hashed");
    Ok(digest)
}

/// Fetch and hash every asset, at most [`MAX_PARALLEL_DOWNLOADS`] at a time.
///
/// Completion order is not preserved; results are keyed by filename. The
/// first failure aborts the whole batch and drops downloads still in flight.
///
/// # Errors
///
/// Returns the first [`DownloadError`] encountered.
pub async fn fetch_and_hash_all<R: Reporter + ?Sized>(
    client: &Client,
    assets: &[AssetRequest],
    token: Option<&str>,
    reporter: &R,
) -> Result<HashMap<String, Sha256Digest>, DownloadError> {
    info!(count = assets.len(), "fetching release assets");

    hash_bounded(assets, |asset| fetch_and_hash(client, &asset.url, token, reporter)).await
}

/// Run `job` over `assets` with at most [`MAX_PARALLEL_DOWNLOADS`] in flight,
/// collecting digests by filename.
async fn hash_bounded<'a, F, Fut>(
    assets: &'a [AssetRequest],
    job: F,
) -> Result<HashMap<String, Sha256Digest>, DownloadError>
where
    F: Fn(&'a AssetRequest) -> Fut,
    Fut: Future<Output = Result<Sha256Digest, DownloadError>>,
{
    stream::iter(assets)
        .map(|asset| {
            let pending = job(asset);
            async move { Ok::<_, DownloadError>((asset.filename.clone(), pending.await?)) }
        })
        .buffer_unordered(MAX_PARALLEL_DOWNLOADS)
        .try_collect()
        .await
}
