// ============================================================================
// CATALOG CONFIGURATION
// ============================================================================
// Compile-time defaults for talking to the ambientCG v2 API.
//
// Runtime overrides:
//   - CatalogClient::with_base_url / CatalogClient::page_limit
//   - CLI: --base-url (or AMBIENTCG_BASE_URL), --page-limit
// ============================================================================

// ----------------------------------------------------------------------------
// ENDPOINT
// ----------------------------------------------------------------------------

/// Search endpoint returning full asset records as JSON
pub const API_BASE_URL: &str = "https://ambientCG.com/api/v2/full_json";

/// Number of assets requested per page
pub const PAGE_LIMIT: u32 = 20;

/// Record sections requested with every query (`include=` parameter)
pub const INCLUDE_FIELDS: &[&str] = &["downloadData", "imageData", "displayData"];

/// User-Agent string for HTTP requests
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// ----------------------------------------------------------------------------
// ASSET LAYOUT
// ----------------------------------------------------------------------------

/// Preview image sizes, in order of preference (largest first)
pub const RESOLUTIONS: [u32; 5] = [2048, 1024, 512, 256, 128];

/// Download folder holding the regular archives
pub const DEFAULT_DOWNLOAD_FOLDER: &str = "default";

/// Filetype category holding zip archives
pub const ZIP_CATEGORY: &str = "zip";

/// Key of a PNG preview image, e.g. `512-PNG`
pub fn png_preview_key(resolution: u32) -> String {
    format!("{}-PNG", resolution)
}

/// All PNG preview keys, in preference order
pub fn png_preview_keys() -> Vec<String> {
    RESOLUTIONS.iter().map(|&res| png_preview_key(res)).collect()
}
