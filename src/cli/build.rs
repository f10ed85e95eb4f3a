//
//  bamboo-cli
//  cli/build.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Build commands.
//!
//! ```bash
//! bamboo build latest-successful PROJ-CORE
//! bamboo build latest PROJ-CORE
//! bamboo build lifecycle PROJ-CORE/12
//! bamboo build state PROJ-CORE-12
//! bamboo build changes PROJ-CORE/12
//! bamboo build issues PROJ-CORE/12 --json
//! bamboo build queue PROJ-CORE --stage Deploy --custom-revision 3f2a9c1
//! ```
//!
//! Builds are identified as `PLAN-KEY/NUMBER` or `PLAN-KEY-NUMBER`.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::plans::QueueOptions;
use crate::api::results::BuildState;
use crate::output::{format_status, print_field, TableOutput};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct BuildCommand {
    #[command(subcommand)]
    pub command: BuildSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BuildSubcommand {
    /// Number of the newest successful build of a plan
    #[command(name = "latest-successful", visible_alias = "green")]
    LatestSuccessful(PlanArgs),

    /// State and number of the newest build of a plan
    Latest(PlanArgs),

    /// Lifecycle state of a build (Queued, InProgress, Finished, ...)
    #[command(visible_alias = "status")]
    Lifecycle(BuildArgs),

    /// Outcome of a build (Successful, Failed, Unknown)
    State(BuildArgs),

    /// Authors of the changes in a build and the builds it depends on
    Changes(BuildArgs),

    /// JIRA issues linked to a build and the builds it depends on
    Issues(BuildArgs),

    /// Queue a build of a plan
    Queue(QueueArgs),
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Plan key, e.g. PROJ-CORE
    pub plan: String,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Build, e.g. PROJ-CORE/12 or PROJ-CORE-12
    pub build: String,
}

#[derive(Args, Debug)]
pub struct QueueArgs {
    /// Plan key, optionally with a build number to re-run
    pub plan: String,

    /// Run up to and including this stage
    #[arg(long)]
    pub stage: Option<String>,

    /// Run manual stages as well
    #[arg(long)]
    pub execute_all_stages: bool,

    /// VCS revision to build
    #[arg(long)]
    pub custom_revision: Option<String>,
}

impl QueueArgs {
    fn options(&self) -> QueueOptions {
        QueueOptions {
            stage: self.stage.clone(),
            execute_all_stages: self.execute_all_stages.then_some(true),
            custom_revision: self.custom_revision.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BuildNumber {
    plan: String,
    number: String,
}

impl TableOutput for BuildNumber {
    fn print_table(&self, _color: bool) {
        println!("{}", self.number);
    }
}

#[derive(Debug, Serialize)]
struct LatestBuild {
    plan: String,
    number: String,
    state: BuildState,
}

impl TableOutput for LatestBuild {
    fn print_table(&self, color: bool) {
        let number = format!("#{}", self.number);
        let number = if color {
            style(number).cyan().bold().to_string()
        } else {
            number
        };
        println!(
            "{} {} {}",
            self.plan,
            number,
            format_status(&self.state.to_string(), color)
        );
    }
}

#[derive(Debug, Serialize)]
struct BuildField {
    build: String,
    #[serde(skip)]
    label: &'static str,
    value: String,
}

impl TableOutput for BuildField {
    fn print_table(&self, color: bool) {
        print_field(self.label, &format_status(&self.value, color), color);
    }
}

impl BuildCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            BuildSubcommand::LatestSuccessful(args) => self.latest_successful(args, global).await,
            BuildSubcommand::Latest(args) => self.latest(args, global).await,
            BuildSubcommand::Lifecycle(args) => self.lifecycle(args, global).await,
            BuildSubcommand::State(args) => self.state(args, global).await,
            BuildSubcommand::Changes(args) => self.changes(args, global).await,
            BuildSubcommand::Issues(args) => self.issues(args, global).await,
            BuildSubcommand::Queue(args) => self.queue(args, global).await,
        }
    }

    async fn latest_successful(&self, args: &PlanArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let params = global.query();
        let number = client
            .latest_successful_build_number(&args.plan, params.as_ref())
            .await?;

        global.writer().write(&BuildNumber {
            plan: args.plan.clone(),
            number,
        })
    }

    async fn latest(&self, args: &PlanArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let summary = client.latest_build_status(&args.plan).await?;

        global.writer().write(&LatestBuild {
            plan: args.plan.clone(),
            number: summary.number,
            state: summary.state,
        })
    }

    async fn lifecycle(&self, args: &BuildArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let value = client.build_status(&args.build).await?;

        global.writer().write(&BuildField {
            build: args.build.clone(),
            label: "Lifecycle",
            value,
        })
    }

    async fn state(&self, args: &BuildArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let state = client.build_state(&args.build).await?;

        global.writer().write(&BuildField {
            build: args.build.clone(),
            label: "State",
            value: state.to_string(),
        })
    }

    async fn changes(&self, args: &BuildArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let authors = client.changes_from_build(&args.build).await?;

        if authors.is_empty() && !global.json {
            global
                .writer()
                .write_warning(&format!("No changes found for {}", args.build));
            return Ok(());
        }
        global.writer().write_list(&authors)
    }

    async fn issues(&self, args: &BuildArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let keys = client.jira_issues_from_build(&args.build).await?;

        if keys.is_empty() && !global.json {
            global
                .writer()
                .write_warning(&format!("No JIRA issues linked to {}", args.build));
            return Ok(());
        }
        global.writer().write_list(&keys)
    }

    async fn queue(&self, args: &QueueArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let params = global.query();
        let options = args.options();
        let body = client
            .queue_build(&args.plan, params.as_ref(), Some(&options))
            .await?;

        if global.json {
            let value = serde_json::from_str::<serde_json::Value>(&body)
                .unwrap_or(serde_json::Value::String(body));
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        let queued: Option<serde_json::Value> = serde_json::from_str(&body).ok();
        let key = queued
            .as_ref()
            .and_then(|v| v.get("buildResultKey"))
            .and_then(|v| v.as_str())
            .unwrap_or(&args.plan);
        global
            .writer()
            .write_success(&format!("Queued {}", style(key).cyan()));
        Ok(())
    }
}
