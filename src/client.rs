//! HTTP client for the ambientCG catalog API.
//!
//! Wraps the `full_json` endpoint (paginated search and single-asset
//! lookup) using [`reqwest`].

use crate::asset::Asset;
use crate::config::{API_BASE_URL, PAGE_LIMIT, USER_AGENT};
use crate::error::CatalogError;
use crate::filters::SearchParameters;
use crate::model::{ApiAsset, ApiResponse, PageCursor};
use crate::query::{build_asset_query_string, build_query_string};
use crate::search::{paginate, PageFetcher};
use async_trait::async_trait;
use futures_util::Stream;

/// Page fetcher backed by a [`reqwest::Client`].
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<ApiResponse, CatalogError> {
        let url = cursor.as_str();
        tracing::info!("Querying {} for assets", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| CatalogError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        // Read the body first so a broken connection is not reported as bad JSON
        let text = response.text().await.map_err(|source| CatalogError::Request {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| CatalogError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Entry point for searching the catalog and looking up assets
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    page_limit: u32,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient {
    /// Client for the public ambientCG endpoint
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL)
    }

    /// * `base_url` - Search endpoint without query, e.g. `http://host/api/v2/full_json`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page_limit: PAGE_LIMIT,
        }
    }

    /// Number of assets requested per page
    pub fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the first results page for `params`
    pub fn search_url(&self, params: &SearchParameters) -> String {
        format!("{}?{}", self.base_url, build_query_string(params, self.page_limit))
    }

    /// Lazily stream the ids of all assets matching `params`.
    ///
    /// Each call opens its own HTTP client and starts again from the first page.
    pub fn search(&self, params: &SearchParameters) -> impl Stream<Item = Result<String, CatalogError>> {
        let url = self.search_url(params);
        tracing::debug!(?params, "Starting search");
        paginate(HttpFetcher::new(), PageCursor::new(url))
    }

    /// Fetch the full record of one asset
    pub async fn fetch_asset(&self, asset_id: &str) -> Result<ApiAsset, CatalogError> {
        let url = format!("{}?{}", self.base_url, build_asset_query_string(asset_id));
        let page = HttpFetcher::new().fetch_page(&PageCursor::new(url)).await?;

        page.found_assets
            .into_iter()
            .find(|asset| asset.asset_id == asset_id)
            .ok_or_else(|| CatalogError::AssetNotFound(asset_id.to_string()))
    }

    /// Fetch one asset and derive its preview URL and available sizes
    pub async fn resolve_asset(&self, asset_id: &str) -> Result<(Option<String>, Vec<String>), CatalogError> {
        let api_asset = self.fetch_asset(asset_id).await?;
        let asset = Asset::new(&api_asset);
        Ok((asset.preview_image().map(str::to_string), asset.available_sizes()))
    }
}
