//
//  bamboo-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Command-Line Interface Definitions
//!
//! This module defines the CLI structure for `bamboo` using clap's derive API.
//!
//! ## Command Structure
//!
//! ```text
//! bamboo [GLOBAL OPTIONS] <COMMAND> [SUBCOMMAND] [OPTIONS]
//! ```
//!
//! ## Available Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `build` | Latest builds, build states, changes, JIRA issues, queueing |
//! | `plan` | List, enable, disable and branch plans |
//! | `artifact` | Download shared build artifacts |
//! | `search` | Search Bamboo entities |
//! | `config` | Manage the configuration file |
//! | `completion` | Generate shell completions |
//! | `version` | Print the version |
//!
//! ## Global Options
//!
//! | Option | Environment | Description |
//! |--------|-------------|-------------|
//! | `--host` | `BAMBOO_HOST` | Bamboo base URL |
//! | `--user` | `BAMBOO_USER` | Basic-auth user |
//! | `--password` | `BAMBOO_PASSWORD` | Basic-auth password or token |
//! | `--param KEY=VALUE` | | Extra query parameter (repeatable) |
//! | `--json` | | JSON output |
//! | `--no-prompt` | `BAMBOO_NO_PROMPT` | Never prompt |
//!
//! Flags override the configuration file (see [`crate::config`]).

mod artifact;
mod build;
mod completion;
mod config;
mod plan;
mod search;

pub use artifact::ArtifactCommand;
pub use build::BuildCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use plan::PlanCommand;
pub use search::SearchCommand;

use std::fmt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use crate::api::{BambooClient, QueryParams};
use crate::config::{normalize_host, Config, ServerConfig};
use crate::output::{OutputFormat, OutputWriter};
use crate::util::{parse_key_value, query_params};

/// The root CLI structure.
#[derive(Parser, Debug)]
#[command(
    name = "bamboo",
    version,
    about = "Work with Atlassian Bamboo from the command line",
    long_about = "bamboo is a CLI for the Atlassian Bamboo REST API.\n\n\
                  It finds green builds, follows dependent builds for changes and JIRA issues,\n\
                  queues builds, manages plans and downloads artifacts.",
    propagate_version = true,
    after_help = "Use 'bamboo <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options available to every command.
#[derive(Parser, Clone, Default)]
pub struct GlobalOptions {
    /// Bamboo base URL, e.g. https://ci.example.com
    #[arg(long, global = true, env = "BAMBOO_HOST")]
    pub host: Option<String>,

    /// Username for HTTP basic auth
    #[arg(long, short = 'u', global = true, env = "BAMBOO_USER")]
    pub user: Option<String>,

    /// Password or personal access token for HTTP basic auth
    #[arg(long, global = true, env = "BAMBOO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Extra query parameter sent with the request, e.g. os_authType=basic
    #[arg(
        long = "param",
        global = true,
        value_name = "KEY=VALUE",
        value_parser = parse_key_value
    )]
    pub params: Vec<(String, String)>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long, global = true, env = "BAMBOO_NO_PROMPT")]
    pub no_prompt: bool,
}

impl fmt::Debug for GlobalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalOptions")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("params", &self.params)
            .field("json", &self.json)
            .field("no_prompt", &self.no_prompt)
            .finish()
    }
}

impl GlobalOptions {
    /// Server settings given on the command line or in the environment.
    pub fn server_overrides(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.as_deref().map(normalize_host),
            username: self.user.clone(),
            password: self.password.clone(),
        }
    }

    /// Builds a client from the configuration file overlaid with the flags.
    pub fn client(&self) -> Result<BambooClient> {
        let config = Config::load()?;
        let mut server = config.server;
        server.merge(self.server_overrides());
        if !server.has_credentials() && (server.username.is_some() || server.password.is_some()) {
            warn!("username and password must both be set; connecting anonymously");
        }

        let client = BambooClient::from_config(&server)?.with_limits(config.walker);
        debug!(url = %client.display_url(), "using bamboo server");
        Ok(client)
    }

    /// Extra query parameters from `--param`.
    pub fn query(&self) -> Option<QueryParams> {
        query_params(&self.params)
    }

    pub fn format(&self) -> OutputFormat {
        OutputFormat::from_json_flag(self.json)
    }

    pub fn writer(&self) -> OutputWriter {
        OutputWriter::new(self.format())
    }
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and queue builds
    #[command(visible_alias = "b")]
    Build(BuildCommand),

    /// List and manage plans
    #[command(visible_alias = "p")]
    Plan(PlanCommand),

    /// Download shared build artifacts
    Artifact(ArtifactCommand),

    /// Search users, authors, plans, branches, projects or versions
    Search(SearchCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_params_are_repeatable() {
        let cli = Cli::try_parse_from([
            "bamboo",
            "plan",
            "list",
            "--param",
            "os_authType=basic",
            "--param",
            "start-index=25",
        ])
        .unwrap();

        let query = cli.global.query().unwrap();
        assert_eq!(query.get("os_authType").map(String::as_str), Some("basic"));
        assert_eq!(query.get("start-index").map(String::as_str), Some("25"));
    }

    #[test]
    fn test_invalid_param_is_rejected() {
        let err = Cli::try_parse_from(["bamboo", "--param", "oops", "plan", "list"]).unwrap_err();
        assert!(err.to_string().contains("KEY=VALUE"));
    }

    #[test]
    fn test_debug_masks_password() {
        let cli = Cli::try_parse_from(["bamboo", "--password", "s3cret", "version"]).unwrap();
        let debug = format!("{:?}", cli);

        assert!(debug.contains("********"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_host_flag_is_normalized() {
        let global = GlobalOptions {
            host: Some("ci.example.com:8085/".into()),
            ..Default::default()
        };
        assert_eq!(
            global.server_overrides().host.as_deref(),
            Some("http://ci.example.com:8085")
        );
    }
}
