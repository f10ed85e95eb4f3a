//
//  bamboo-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Bamboo REST API
//!
//! This module provides the types shared by every endpoint module: the unified
//! [`ApiError`] taxonomy, the [`QueryParams`] alias used for free-form query
//! strings, the [`WalkLimits`] that bound the paginated and provenance walkers,
//! and the page walker itself (re-exported from the [`pagination`] submodule).
//!
//! # Error Taxonomy
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `Network` | The HTTP call itself failed (DNS, connect, TLS, timeout) |
//! | `Unreachable` | The server answered with a status outside the accepted set |
//! | `NoResults` | A result endpoint returned no results at all |
//! | `NoSuccessfulBuild` | Pagination finished without a successful build |
//! | `NoPlans` | The plan collection is empty |
//! | `MalformedBody` | The response body is not the expected JSON shape |
//! | `InvalidUrl` | The base URL could not be parsed or carry credentials |
//! | `PaginationStalled` | Server page metadata would not advance the offset |
//! | `PageLimitExceeded` | More pages than [`WalkLimits::max_pages`] |
//! | `ProvenanceTooDeep` | A "child of" chain longer than [`WalkLimits::max_chain_depth`] |
//! | `Io` | Writing streamed artifact content failed |
//!
//! # Example
//!
//! ```rust
//! use bamboo_cli::api::common::ApiError;
//!
//! fn describe(result: Result<String, ApiError>) -> String {
//!     match result {
//!         Ok(number) => format!("latest green build is #{}", number),
//!         Err(ApiError::NoSuccessfulBuild) => "nothing green yet".to_string(),
//!         Err(e) if e.is_not_found() => "no such plan".to_string(),
//!         Err(e) => format!("error: {}", e),
//!     }
//! }
//!
//! assert_eq!(describe(Err(ApiError::NoSuccessfulBuild)), "nothing green yet");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Extra query-string parameters merged into a request.
///
/// An ordered map keeps the generated query string deterministic, which keeps
/// request matching in tests stable.
pub type QueryParams = BTreeMap<String, String>;

/// Unified error type for all Bamboo API operations.
///
/// Every operation in the library returns `Result<T, ApiError>`. Walkers abort
/// on the first error they see and never return partial results alongside it.
///
/// # Example
///
/// ```rust
/// use bamboo_cli::api::common::ApiError;
///
/// let err = ApiError::Unreachable { status: 404, message: None };
/// assert!(err.is_not_found());
/// assert_eq!(err.to_string(), "Unreachable endpoint! Response status code: 404");
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// A network-level error occurred during the request.
    ///
    /// Covers connection failures, timeouts, DNS resolution errors and other
    /// transport-layer issues. The underlying `reqwest::Error` is kept as-is.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a status code the operation does not accept.
    ///
    /// Read operations accept only HTTP 200; state-changing operations accept
    /// 200 and 204.
    ///
    /// # Fields
    ///
    /// - `status` - The HTTP status code that was returned
    /// - `message` - The server's `message` field, when the body carried one
    #[error("Unreachable endpoint! Response status code: {status}{}", message_suffix(.message))]
    Unreachable {
        /// HTTP status code returned by the server.
        status: u16,
        /// Human readable reason extracted from the error body, if any.
        message: Option<String>,
    },

    /// The result endpoint returned no results at all.
    #[error("The plan doesn't contain any result")]
    NoResults,

    /// Every page was walked and no build was successful.
    #[error("The plan doesn't contain any successful build")]
    NoSuccessfulBuild,

    /// The plan collection is empty.
    #[error("No plans available")]
    NoPlans,

    /// The response body could not be parsed as the expected JSON shape.
    #[error("Malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// The configured base URL is unusable.
    ///
    /// Raised at construction when the URL cannot be parsed or cannot carry
    /// embedded credentials (e.g. `mailto:` style URLs).
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// The server reported page metadata that does not move past `offset`.
    #[error("Pagination stalled at start-index {offset}: server page metadata does not advance")]
    PaginationStalled {
        /// Offset of the page that failed to advance.
        offset: u32,
    },

    /// The walk needed more pages than allowed.
    #[error("Pagination exceeded the limit of {limit} pages")]
    PageLimitExceeded {
        /// The configured page limit.
        limit: usize,
    },

    /// A dependent-build chain is longer than allowed.
    #[error("Dependent build chain starting at {build} exceeds {limit} links")]
    ProvenanceTooDeep {
        /// The build the walk started from.
        build: String,
        /// The configured depth limit.
        limit: usize,
    },

    /// Writing streamed content to a sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Returns the HTTP status code carried by an `Unreachable` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unreachable { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Upper bounds for the two result walkers.
///
/// Neither the pagination protocol nor the "child of" provenance chain is
/// bounded by the server, so the client enforces both limits.
///
/// # Fields
///
/// | Field | Default | Applies to |
/// |-------|---------|------------|
/// | `max_pages` | 1000 | [`PageWalker`] |
/// | `max_chain_depth` | 64 | [`crate::api::provenance::ProvenanceWalker`] |
///
/// # Example
///
/// ```rust
/// use bamboo_cli::api::common::WalkLimits;
///
/// let limits = WalkLimits::default();
/// assert_eq!(limits.max_pages, 1000);
/// assert_eq!(limits.max_chain_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkLimits {
    /// Maximum number of pages a single paginated walk may request.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum number of dependent-build links a provenance walk may follow.
    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,
}

fn default_max_pages() -> usize {
    1000
}

fn default_max_chain_depth() -> usize {
    64
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_chain_depth: default_max_chain_depth(),
        }
    }
}
