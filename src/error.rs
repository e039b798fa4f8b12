//! Error types shared by the catalog client, downloader and extractor.

use std::path::PathBuf;

/// Errors raised while talking to the catalog or handling its files.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status code.
    #[error("Catalog returned {status} for {url}: {body}")]
    Status {
        url: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The page body was not a valid catalog response.
    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("The '{0}' download has no link")]
    MissingDownloadLink(String),

    #[error("Download cancelled")]
    Cancelled,

    #[error("Refusing to overwrite existing file: {0:?}")]
    DestinationExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Task join error: {0}")]
    Task(#[from] tokio::task::JoinError),
}
