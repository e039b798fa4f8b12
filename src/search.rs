// Copyright (C) 2026 SpruceOS Team
// Licensed under GPL-3.0-or-later

//! Cursor-following pagination over catalog search results.
//!
//! A search is a lazy stream of asset ids. A page is requested only once the
//! consumer has taken every id from the previous one, so dropping the stream
//! is enough to stop a search. The stream cannot be restarted; searching again
//! begins a new run from the first page.

use crate::error::CatalogError;
use crate::model::{ApiResponse, PageCursor};
use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use std::collections::VecDeque;

/// Fetches and decodes one page of results
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<ApiResponse, CatalogError>;
}

struct Pager<F> {
    fetcher: F,
    /// Next page to request; `None` once the server stops handing out cursors
    next: Option<PageCursor>,
    buffered: VecDeque<String>,
    retrieved: u64,
    /// Declared total from the first page; unknown until then
    to_retrieve: Option<u64>,
}

impl<F: PageFetcher> Pager<F> {
    fn wants_more(&self) -> bool {
        self.to_retrieve.map_or(true, |total| total > self.retrieved)
    }

    async fn fetch_next(&mut self, cursor: PageCursor) -> Result<(), CatalogError> {
        let page = self.fetcher.fetch_page(&cursor).await?;

        let total = *self.to_retrieve.get_or_insert(page.number_of_results);
        self.retrieved += page.found_assets.len() as u64;

        tracing::info!(
            "Found {} assets, out of {} total results",
            page.found_assets.len(),
            total
        );

        self.next = page.next_page().cloned();
        self.buffered
            .extend(page.found_assets.into_iter().map(|asset| asset.asset_id));
        Ok(())
    }

    /// Next id, fetching pages until one is buffered or the search is over
    async fn next_id(mut self) -> Result<Option<(String, Self)>, CatalogError> {
        loop {
            if let Some(id) = self.buffered.pop_front() {
                return Ok(Some((id, self)));
            }
            if !self.wants_more() {
                tracing::debug!(retrieved = self.retrieved, "Search complete");
                return Ok(None);
            }
            let Some(cursor) = self.next.take() else {
                tracing::debug!(retrieved = self.retrieved, "No next page, search complete");
                return Ok(None);
            };
            self.fetch_next(cursor).await?;
        }
    }
}

/// Stream the ids of every asset reachable from `first_page`, following
/// next-page cursors until the server stops sending one or the declared
/// total has been retrieved.
///
/// A fetch or decode failure is yielded once and ends the stream.
pub fn paginate<F>(fetcher: F, first_page: PageCursor) -> impl Stream<Item = Result<String, CatalogError>>
where
    F: PageFetcher + 'static,
{
    let pager = Pager {
        fetcher,
        next: Some(first_page),
        buffered: VecDeque::new(),
        retrieved: 0,
        to_retrieve: None,
    };
    stream::try_unfold(pager, Pager::next_id)
}
