//! Query strings for the catalog search endpoint.

use crate::config::INCLUDE_FIELDS;
use crate::filters::SearchParameters;
use url::form_urlencoded::byte_serialize;

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// Encode each element separately and join with a literal comma
fn encode_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values.into_iter().map(encode).collect::<Vec<_>>().join(",")
}

fn to_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the search query for `params`, requesting `limit` assets per page.
///
/// Parameters appear in a fixed order: `q`, `include`, `method`, `type`,
/// `sort`, `limit`. Tags are sent whenever they are given, even when empty;
/// empty filter lists are left out, the same as absent ones.
pub fn build_query_string(params: &SearchParameters, limit: u32) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    if let Some(tags) = params.tags.as_deref() {
        pairs.push(("q", encode(tags)));
    }

    pairs.push(("include", encode_list(INCLUDE_FIELDS.iter().copied())));

    if let Some(methods) = params.methods.as_deref().filter(|m| !m.is_empty()) {
        pairs.push(("method", encode_list(methods.iter().map(|m| m.wire_str()))));
    }

    if let Some(types) = params.types.as_deref().filter(|t| !t.is_empty()) {
        pairs.push(("type", encode_list(types.iter().map(|t| t.wire_str()))));
    }

    if let Some(sort) = params.sort {
        pairs.push(("sort", encode(sort.wire_str())));
    }

    pairs.push(("limit", limit.to_string()));

    to_query(&pairs)
}

/// Query fetching the full record of a single asset
pub fn build_asset_query_string(asset_id: &str) -> String {
    to_query(&[
        ("id", encode(asset_id)),
        ("include", encode_list(INCLUDE_FIELDS.iter().copied())),
    ])
}
