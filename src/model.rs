// Copyright (C) 2026 SpruceOS Team
// Licensed under GPL-3.0-or-later

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;

/// Decode `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Absolute URL of a results page, as handed out by the server.
///
/// Treated as opaque: it is requested as-is and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(url: impl Into<String>) -> Self {
        PageCursor(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of search results
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub found_assets: Vec<ApiAsset>,
    /// Link to the following page; absent on the last one
    #[serde(default)]
    pub next_page_http: Option<PageCursor>,
    /// Total number of assets matching the query, across all pages
    pub number_of_results: u64,
}

impl ApiResponse {
    /// The cursor to follow, if any. An empty link counts as no link.
    pub fn next_page(&self) -> Option<&PageCursor> {
        self.next_page_http.as_ref().filter(|c| !c.as_str().is_empty())
    }
}

/// Full catalog record of one asset
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAsset {
    pub asset_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub creation_method: Option<String>,
    /// Size label (e.g. `512-PNG`) to preview image URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub preview_image: HashMap<String, String>,
    /// Folder name (e.g. `default`) to downloadable files
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_folders: HashMap<String, DownloadFolder>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFolder {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Filetype category name (e.g. `zip`) to its downloads
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_filetype_categories: HashMap<String, DownloadTypeCategory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTypeCategory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub downloads: Option<Vec<Download>>,
}

/// A single downloadable file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Download {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_download_path: String,
    #[serde(default)]
    pub download_link: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filetype: String,
    /// Size/variant label, e.g. `2K-JPG`
    #[serde(default, deserialize_with = "null_as_default")]
    pub attribute: String,
    /// File size in bytes
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    /// Files inside the archive, for zip downloads
    #[serde(default)]
    pub zip_content: Option<Vec<String>>,
}
