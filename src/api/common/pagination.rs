//
//  bamboo-cli
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Offset Pagination for Bamboo Collections
//!
//! Bamboo delivers collections (build results, plans) in pages. Every page
//! carries three counters next to its items:
//!
//! | Wire field | [`Page`] field | Meaning |
//! |------------|----------------|---------|
//! | `size` | `size` | Total number of items across all pages |
//! | `max-result` | `max_result` | Number of items in this page |
//! | `start-index` | `start_index` | Offset of this page's first item |
//!
//! The next page starts at `start-index + max-result`; the walk is over once
//! that offset reaches `size`.
//!
//! [`PageWalker`] hides that protocol behind two operations:
//!
//! - [`PageWalker::collect_all`] concatenates every page in fetch order
//! - [`PageWalker::find_first`] stops at the first item matching a predicate
//!
//! Pages are fetched strictly one after the other. A fetch failure aborts the
//! whole walk and whatever was accumulated is dropped.
//!
//! # Example
//!
//! ```rust
//! use bamboo_cli::api::common::{ApiError, Page, PageWalker};
//!
//! # tokio_test_block(async {
//! let walker = PageWalker::new(10);
//! let items = walker
//!     .collect_all(0, |offset| async move {
//!         Ok::<_, ApiError>(match offset {
//!             0 => Page::new(vec![1, 2], 3, 2, 0),
//!             _ => Page::new(vec![3], 3, 1, 2),
//!         })
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(items, vec![1, 2, 3]);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ApiError, QueryParams};

/// Query parameter carrying the page offset.
pub const START_INDEX: &str = "start-index";

/// Returns the offset a walk starts from.
///
/// A caller-supplied `start-index` wins; anything missing or unparsable
/// starts at `0`.
///
/// ```rust
/// use bamboo_cli::api::common::{start_offset, QueryParams};
///
/// let mut params = QueryParams::new();
/// assert_eq!(start_offset(Some(&params)), 0);
/// params.insert("start-index".into(), "25".into());
/// assert_eq!(start_offset(Some(&params)), 25);
/// ```
pub fn start_offset(params: Option<&QueryParams>) -> u32 {
    params
        .and_then(|p| p.get(START_INDEX))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Builds the query string for the page at `offset`, keeping the caller's
/// extra parameters.
pub fn page_query(params: Option<&QueryParams>, offset: u32) -> QueryParams {
    let mut query = params.cloned().unwrap_or_default();
    query.insert(START_INDEX.to_string(), offset.to_string());
    query
}

/// One page of a paginated Bamboo collection.
///
/// Missing counters deserialize as `0`, which makes a page without any
/// pagination metadata behave as the final page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items of this page in server order.
    pub items: Vec<T>,

    /// Total number of items across all pages.
    pub size: u32,

    /// Number of items in this page (`max-result` on the wire).
    pub max_result: u32,

    /// Offset of the first item of this page (`start-index` on the wire).
    pub start_index: u32,
}

impl<T> Page<T> {
    /// Creates a page from its items and counters.
    pub fn new(items: Vec<T>, size: u32, max_result: u32, start_index: u32) -> Self {
        Self {
            items,
            size,
            max_result,
            start_index,
        }
    }

    /// Returns the offset of the next page, or `None` when this is the last one.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bamboo_cli::api::common::Page;
    ///
    /// let first: Page<u8> = Page::new(vec![1, 2], 3, 2, 0);
    /// assert_eq!(first.next_start(), Some(2));
    ///
    /// let last: Page<u8> = Page::new(vec![3], 3, 1, 2);
    /// assert_eq!(last.next_start(), None);
    /// ```
    pub fn next_start(&self) -> Option<u32> {
        let next = self.start_index.saturating_add(self.max_result);
        (next < self.size).then_some(next)
    }
}

/// Sequential walker over a paginated collection.
///
/// The walker owns the pagination loop; callers only supply a function that
/// fetches the page at a given offset. The offset must strictly increase from
/// one page to the next and the number of pages is capped, so a server that
/// reports inconsistent counters cannot keep the walk alive forever.
#[derive(Debug, Clone, Copy)]
pub struct PageWalker {
    max_pages: usize,
}

impl PageWalker {
    /// Creates a walker that requests at most `max_pages` pages.
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }

    /// Fetches every page starting at `start` and concatenates their items.
    ///
    /// # Errors
    ///
    /// - Any error returned by `fetch`, unchanged
    /// - [`ApiError::PaginationStalled`] if a page does not advance the offset
    /// - [`ApiError::PageLimitExceeded`] if more than `max_pages` are needed
    pub async fn collect_all<T, F, Fut>(&self, start: u32, mut fetch: F) -> Result<Vec<T>, ApiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>>,
    {
        let mut items = Vec::new();
        let mut cursor = Cursor::new(start, self.max_pages);

        while let Some(offset) = cursor.next_offset()? {
            let page = fetch(offset).await?;
            debug!(offset, count = page.items.len(), size = page.size, "fetched page");

            cursor.advance(&page)?;
            items.extend(page.items);
        }

        Ok(items)
    }

    /// Walks pages starting at `start` until an item satisfies `predicate`.
    ///
    /// Returns `Ok(None)` when every page was examined without a match; no
    /// page after the matching one is requested.
    ///
    /// # Errors
    ///
    /// Same as [`collect_all`](Self::collect_all).
    pub async fn find_first<T, F, Fut, P>(
        &self,
        start: u32,
        mut fetch: F,
        mut predicate: P,
    ) -> Result<Option<T>, ApiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>>,
        P: FnMut(&T) -> bool,
    {
        let mut cursor = Cursor::new(start, self.max_pages);

        while let Some(offset) = cursor.next_offset()? {
            let page = fetch(offset).await?;
            debug!(offset, count = page.items.len(), size = page.size, "searching page");

            cursor.advance(&page)?;
            if let Some(found) = page.items.into_iter().find(|item| predicate(item)) {
                return Ok(Some(found));
            }
        }

        Ok(None)
    }
}

/// Loop state shared by both walks.
struct Cursor {
    offset: Option<u32>,
    fetched: usize,
    max_pages: usize,
}

impl Cursor {
    fn new(start: u32, max_pages: usize) -> Self {
        Self {
            offset: Some(start),
            fetched: 0,
            max_pages,
        }
    }

    fn next_offset(&mut self) -> Result<Option<u32>, ApiError> {
        let Some(offset) = self.offset else {
            return Ok(None);
        };
        if self.fetched >= self.max_pages {
            return Err(ApiError::PageLimitExceeded {
                limit: self.max_pages,
            });
        }
        self.fetched += 1;
        Ok(Some(offset))
    }

    fn advance<T>(&mut self, page: &Page<T>) -> Result<(), ApiError> {
        let Some(requested) = self.offset else {
            return Ok(());
        };
        self.offset = match page.next_start() {
            Some(next) if next <= requested => {
                return Err(ApiError::PaginationStalled { offset: requested });
            }
            next => next,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(offset: u32) -> Result<Page<u32>, ApiError> {
        // Seven items served two at a time.
        let size = 7;
        let end = (offset + 2).min(size);
        Ok(Page::new((offset..end).collect(), size, end - offset, offset))
    }

    #[tokio::test]
    async fn test_collect_all_concatenates_in_fetch_order() {
        let mut requested = Vec::new();
        let items = PageWalker::new(100)
            .collect_all(0, |offset| {
                requested.push(offset);
                async move { numbered(offset) }
            })
            .await
            .unwrap();

        assert_eq!(items, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(requested, vec![0, 2, 4, 6]);
    }

    #[tokio::test]
    async fn test_collect_all_single_page_without_metadata() {
        let items = PageWalker::new(100)
            .collect_all(0, |_| async { Ok(Page::new(vec!["a", "b"], 0, 0, 0)) })
            .await
            .unwrap();

        assert_eq!(items, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_collect_all_starts_at_given_offset() {
        let items = PageWalker::new(100)
            .collect_all(4, |offset| async move { numbered(offset) })
            .await
            .unwrap();

        assert_eq!(items, vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn test_find_first_stops_at_match() {
        let mut requested = Vec::new();
        let found = PageWalker::new(100)
            .find_first(
                0,
                |offset| {
                    requested.push(offset);
                    async move { numbered(offset) }
                },
                |item| *item == 3,
            )
            .await
            .unwrap();

        assert_eq!(found, Some(3));
        assert_eq!(requested, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_find_first_exhausts_pages_without_match() {
        let mut calls = 0;
        let found = PageWalker::new(100)
            .find_first(
                0,
                |offset| {
                    calls += 1;
                    async move { numbered(offset) }
                },
                |item| *item > 100,
            )
            .await
            .unwrap();

        assert_eq!(found, None);
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn test_fetch_error_aborts_walk() {
        let mut calls = 0;
        let result = PageWalker::new(100)
            .collect_all(0, |offset| {
                calls += 1;
                async move {
                    if offset == 2 {
                        Err(ApiError::Unreachable {
                            status: 500,
                            message: None,
                        })
                    } else {
                        numbered(offset)
                    }
                }
            })
            .await;

        assert!(matches!(
            result,
            Err(ApiError::Unreachable { status: 500, .. })
        ));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_stalled_pagination_is_rejected() {
        // The server keeps answering with the first page.
        let result = PageWalker::new(100)
            .collect_all(0, |_| async { Ok(Page::new(vec![1, 2], 10, 2, 0)) })
            .await;

        assert!(matches!(
            result,
            Err(ApiError::PaginationStalled { offset: 2 })
        ));
    }

    #[tokio::test]
    async fn test_zero_page_size_is_rejected() {
        let result = PageWalker::new(100)
            .collect_all(0, |_| async { Ok(Page::<u8>::new(vec![], 10, 0, 0)) })
            .await;

        assert!(matches!(
            result,
            Err(ApiError::PaginationStalled { offset: 0 })
        ));
    }

    #[tokio::test]
    async fn test_page_limit_is_enforced() {
        let mut calls = 0;
        let result = PageWalker::new(2)
            .collect_all(0, |offset| {
                calls += 1;
                async move { numbered(offset) }
            })
            .await;

        assert!(matches!(
            result,
            Err(ApiError::PageLimitExceeded { limit: 2 })
        ));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_page_query_overrides_start_index() {
        let mut params = QueryParams::new();
        params.insert("os_authType".into(), "basic".into());
        params.insert(START_INDEX.into(), "oops".into());

        assert_eq!(start_offset(Some(&params)), 0);
        let query = page_query(Some(&params), 50);
        assert_eq!(query.get(START_INDEX).map(String::as_str), Some("50"));
        assert_eq!(query.get("os_authType").map(String::as_str), Some("basic"));
        assert_eq!(page_query(None, 0).len(), 1);
    }

    #[test]
    fn test_next_start() {
        assert_eq!(Page::new(vec![0u8; 2], 5, 2, 0).next_start(), Some(2));
        assert_eq!(Page::new(vec![0u8; 1], 5, 1, 4).next_start(), None);
        assert_eq!(Page::<u8>::new(vec![], 0, 0, 0).next_start(), None);
    }
}
