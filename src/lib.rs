//! Client for the ambientCG material catalog.
//!
//! - [`CatalogClient::search`] streams the ids of matching assets, page by page.
//! - [`CatalogClient::fetch_asset`] returns one full record, and [`Asset`]
//!   derives its preview image and available download sizes.
//! - [`download::download_file`] and [`extract::extract_zip`] fetch and unpack
//!   the archive behind a [`Download`] record.

pub mod asset;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod filters;
pub mod logging;
pub mod model;
pub mod query;
pub mod search;

pub use asset::{resolve, Asset, MissingBranch};
pub use client::{CatalogClient, HttpFetcher};
pub use error::CatalogError;
pub use filters::{AssetType, Method, ParseFilterError, SearchParameters, Sort};
pub use model::{ApiAsset, ApiResponse, Download, DownloadFolder, DownloadTypeCategory, PageCursor};
pub use search::{paginate, PageFetcher};
