//
//  bamboo-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bamboo CLI Library
//!
//! A client library and command-line interface for the Atlassian Bamboo REST
//! API.
//!
//! ## Overview
//!
//! This library provides the core functionality for the `bamboo` CLI tool.
//! The [`api`] layer can also be used on its own to query and drive a Bamboo
//! server from Rust.
//!
//! ## Features
//!
//! - **Result walking**: Finds the newest successful build across paginated
//!   result collections
//! - **Dependent builds**: Follows "Child of" links to gather changes and JIRA
//!   issues from a whole build chain
//! - **Plan management**: List, enable, disable, branch and queue plans
//! - **Artifacts**: Stream shared artifacts to disk or stdout
//! - **Interactive & Scriptable**: Terminal tables with JSON output for automation
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: HTTP client for the Bamboo REST API
//! - [`config`]: Configuration file management
//! - [`output`]: Output formatting (Table, JSON)
//! - [`interactive`]: Confirmation and password prompts
//! - [`util`]: Utility functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bamboo_cli::api::BambooClient;
//! use bamboo_cli::Config;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let client = BambooClient::from_config(&config.server)?.with_limits(config.walker);
//!
//! for plan in client.all_plans(None).await? {
//!     println!("{} {}", plan.key, plan.name);
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions and handlers.
///
/// Each top-level command lives in its own submodule and exposes an async
/// `run(&self, global: &GlobalOptions)` method.
pub mod cli;

/// API client layer for Bamboo.
///
/// - Credential embedding and response classification
/// - Pagination and dependent-build walkers
/// - Typed results for builds, plans, artifacts and search
pub mod api;

/// Configuration management.
///
/// Loads and saves `config.toml` holding server settings and walker limits.
pub mod config;

/// Output formatting for table and JSON modes.
pub mod output;

/// Interactive terminal prompts.
pub mod interactive;

/// Utility functions and helpers.
pub mod util;

/// Re-export of the main CLI struct for convenient access.
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Application name constant.
pub const APP_NAME: &str = "bamboo";

/// Application version, from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process exit codes.
///
/// | Code | Meaning |
/// |------|---------|
/// | 0 | Success |
/// | 1 | General error |
/// | 2 | Usage error (reported by clap) |
/// | 8 | Resource not found (HTTP 404) |
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;

    pub const ERROR: i32 = 1;

    pub const USAGE: i32 = 2;

    pub const NOT_FOUND: i32 = 8;
}

/// Maps a command failure to its exit code.
///
/// ```rust
/// use bamboo_cli::api::ApiError;
/// use bamboo_cli::{exit_code_for, exit_codes};
///
/// let missing = anyhow::Error::new(ApiError::Unreachable { status: 404, message: None });
/// assert_eq!(exit_code_for(&missing), exit_codes::NOT_FOUND);
/// assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), exit_codes::ERROR);
/// ```
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<api::ApiError>() {
        Some(e) if e.is_not_found() => exit_codes::NOT_FOUND,
        _ => exit_codes::ERROR,
    }
}
