//
//  bamboo-cli
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Configuration commands.
//!
//! ```bash
//! bamboo config set host https://ci.example.com
//! bamboo config set username jdoe
//! bamboo config set password          # prompts without echo
//! bamboo config get max_pages
//! bamboo config list
//! bamboo config path
//! ```

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, KEYS};
use crate::interactive::{can_prompt, prompt_password};
use crate::output::print_header;

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a value
    Get(GetArgs),

    /// Set a value
    Set(SetArgs),

    /// Reset a value to its default
    Unset(GetArgs),

    /// Print every value
    #[command(visible_alias = "ls")]
    List,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// One of: host, username, password, max_pages, max_chain_depth
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// One of: host, username, password, max_pages, max_chain_depth
    pub key: String,

    /// New value; for `password` it is prompted for when omitted
    pub value: Option<String>,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::Unset(args) => self.unset(args, global),
            ConfigSubcommand::List => self.list(global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        check_key(&args.key)?;
        let config = Config::load()?;
        let value = config.get(&args.key);

        if global.json {
            let result = serde_json::json!({
                "key": args.key,
                "value": value,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if let Some(v) = value {
            println!("{}", v);
        }
        Ok(())
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let value = match (&args.value, args.key.as_str()) {
            (Some(value), _) => value.clone(),
            (None, "password") if can_prompt(global.no_prompt) => prompt_password("Password")?,
            (None, _) => bail!("A value is required for '{}'", args.key),
        };

        let mut config = Config::load()?;
        config.set(&args.key, &value)?;
        config.save()?;

        let shown = display_value(&args.key, config.get(&args.key));
        if global.json {
            let result = serde_json::json!({
                "success": true,
                "key": args.key,
                "value": shown,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                style(&args.key).cyan(),
                shown.unwrap_or_default()
            );
        }
        Ok(())
    }

    fn unset(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let mut config = Config::load()?;
        if !config.unset(&args.key) {
            check_key(&args.key)?;
        }
        config.save()?;

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "key": args.key,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{} Unset {}", style("✓").green(), style(&args.key).cyan());
        }
        Ok(())
    }

    fn list(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;

        if global.json {
            let entries: serde_json::Map<String, serde_json::Value> = KEYS
                .iter()
                .map(|key| {
                    let value = display_value(key, config.get(key));
                    (key.to_string(), serde_json::json!(value))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        println!();
        print_header("Server");
        for key in ["host", "username", "password"] {
            self.print_kv(key, display_value(key, config.get(key)));
        }
        println!();
        print_header("Walker limits");
        for key in ["max_pages", "max_chain_depth"] {
            self.print_kv(key, config.get(key));
        }
        println!();
        Ok(())
    }

    fn path(&self, global: &GlobalOptions) -> Result<()> {
        let config_path = Config::config_path()?;

        if global.json {
            let result = serde_json::json!({
                "path": config_path.display().to_string(),
                "exists": config_path.exists(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", config_path.display());
        }
        Ok(())
    }

    fn print_kv(&self, key: &str, value: Option<String>) {
        match value {
            Some(v) => println!("  {}: {}", style(key).cyan(), v),
            None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
        }
    }
}

fn check_key(key: &str) -> Result<()> {
    if !KEYS.contains(&key) {
        bail!("Unknown config key '{}'. Valid keys: {}", key, KEYS.join(", "));
    }
    Ok(())
}

/// Masks the password for display.
fn display_value(key: &str, value: Option<String>) -> Option<String> {
    match key {
        "password" => value.map(|_| "********".to_string()),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_masked() {
        assert_eq!(
            display_value("password", Some("s3cret".into())).as_deref(),
            Some("********")
        );
        assert_eq!(display_value("password", None), None);
        assert_eq!(
            display_value("username", Some("jdoe".into())).as_deref(),
            Some("jdoe")
        );
    }

    #[test]
    fn test_check_key() {
        assert!(check_key("max_chain_depth").is_ok());
        assert!(check_key("editor").is_err());
    }
}
