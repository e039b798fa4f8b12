use crate::config::{png_preview_keys, DEFAULT_DOWNLOAD_FOLDER, ZIP_CATEGORY};
use crate::model::{ApiAsset, Download};
use std::fmt;

/// Step of the download structure that was missing from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingBranch {
    Folder(&'static str),
    Category(&'static str),
    Downloads,
}

impl fmt::Display for MissingBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingBranch::Folder(name) => write!(f, "no '{}' download folder", name),
            MissingBranch::Category(name) => write!(f, "no '{}' filetype category", name),
            MissingBranch::Downloads => f.write_str("no download list"),
        }
    }
}

/// Read-only view over a catalog record, deriving what the UI needs from it
#[derive(Debug, Clone, Copy)]
pub struct Asset<'a> {
    api_asset: &'a ApiAsset,
}

impl<'a> From<&'a ApiAsset> for Asset<'a> {
    fn from(api_asset: &'a ApiAsset) -> Self {
        Asset { api_asset }
    }
}

impl<'a> Asset<'a> {
    pub fn new(api_asset: &'a ApiAsset) -> Self {
        Asset { api_asset }
    }

    /// The raw record from the API
    pub fn api_asset(&self) -> &'a ApiAsset {
        self.api_asset
    }

    pub fn id(&self) -> &'a str {
        &self.api_asset.asset_id
    }

    pub fn name(&self) -> &'a str {
        &self.api_asset.display_name
    }

    /// URL of the largest PNG preview, or `None` if the record has none
    pub fn preview_image(&self) -> Option<&'a str> {
        png_preview_keys()
            .iter()
            .find_map(|key| self.api_asset.preview_image.get(key))
            .map(String::as_str)
    }

    /// Attributes (`1K-JPG`, `2K-PNG`, ...) of the zip downloads, in server order.
    ///
    /// A record without zip downloads yields an empty list; the reason is logged.
    pub fn available_sizes(&self) -> Vec<String> {
        match self.zip_downloads() {
            Ok(downloads) => downloads.iter().map(|d| d.attribute.clone()).collect(),
            Err(missing) => {
                tracing::warn!(
                    asset_id = %self.api_asset.asset_id,
                    "Failed to get available sizes: {}",
                    missing
                );
                Vec::new()
            }
        }
    }

    /// The zip download with the given attribute, e.g. `2K-JPG`
    pub fn download(&self, attribute: &str) -> Option<&'a Download> {
        self.zip_downloads()
            .ok()?
            .iter()
            .find(|d| d.attribute.eq_ignore_ascii_case(attribute))
    }

    /// `downloadFolders["default"].downloadFiletypeCategories["zip"].downloads`
    pub fn zip_downloads(&self) -> Result<&'a [Download], MissingBranch> {
        let folder = self
            .api_asset
            .download_folders
            .get(DEFAULT_DOWNLOAD_FOLDER)
            .ok_or(MissingBranch::Folder(DEFAULT_DOWNLOAD_FOLDER))?;
        let category = folder
            .download_filetype_categories
            .get(ZIP_CATEGORY)
            .ok_or(MissingBranch::Category(ZIP_CATEGORY))?;
        category
            .downloads
            .as_deref()
            .ok_or(MissingBranch::Downloads)
    }
}

/// Preview URL and available sizes of a record
pub fn resolve(api_asset: &ApiAsset) -> (Option<&str>, Vec<String>) {
    let asset = Asset::new(api_asset);
    (asset.preview_image(), asset.available_sizes())
}
