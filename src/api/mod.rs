//
//  bamboo-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the client for Atlassian Bamboo's REST API
//! (`/rest/api/latest`) and the shared-artifact download URLs.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`client`]: Core HTTP client with credentials and response classification
//! - [`common`]: Shared types (errors, query params, walk limits, pagination)
//! - [`provenance`]: Parsing and walking of "Child of" build chains
//! - [`results`]: Build results (latest green build, states, changes, issues)
//! - [`plans`]: Plan listing, queueing, enabling/disabling and branching
//! - [`artifacts`]: Shared artifact download, whole or streamed
//! - [`search`]: Free-form entity search
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bamboo_cli::api::BambooClient;
//!
//! # async fn run() -> Result<(), bamboo_cli::api::ApiError> {
//! let client = BambooClient::new(Some("https://ci.example.com"), Some("jdoe"), Some("s3cret"))?;
//!
//! let number = client.latest_successful_build_number("PROJ-CORE", None).await?;
//! let issues = client.jira_issues_from_build(&format!("PROJ-CORE/{}", number)).await?;
//! println!("#{} fixed {}", number, issues.join(", "));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns `Result<T, ApiError>`; see [`ApiError`] for the
//! variants. Status codes outside the accepted set become
//! `ApiError::Unreachable`, carrying the status and the server's message.

/// Core HTTP client wrapper for Bamboo.
///
/// Provides the [`BambooClient`] struct which handles:
/// - Default base URL and credential embedding
/// - Query string and form encoding
/// - Status code classification
pub mod client;

/// Common types shared by every endpoint module.
pub mod common;

/// Dependent-build ("Child of") chains.
pub mod provenance;

pub mod artifacts;
pub mod plans;
pub mod results;
pub mod search;

/// Re-export of the main Bamboo API client.
pub use client::BambooClient;

/// Re-export of common API types.
pub use common::{ApiError, QueryParams, WalkLimits};
