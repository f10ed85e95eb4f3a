//
//  bamboo-cli
//  cli/plan.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Plan commands.
//!
//! ```bash
//! bamboo plan list
//! bamboo plan enable PROJ-CORE
//! bamboo plan disable PROJ-CORE --yes
//! bamboo plan branch PROJ-CORE feature-x --vcs-branch refs/heads/feature-x
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::api::plans::Plan;
use crate::interactive::confirm_action;
use crate::output::{truncate, TableBuilder};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub command: PlanSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PlanSubcommand {
    /// List all plans
    #[command(visible_alias = "ls")]
    List,

    /// Enable a plan
    Enable(KeyArgs),

    /// Disable a plan
    Disable(DisableArgs),

    /// Create a branch plan
    Branch(BranchArgs),
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Plan key, e.g. PROJ-CORE
    pub plan: String,
}

#[derive(Args, Debug)]
pub struct DisableArgs {
    /// Plan key, e.g. PROJ-CORE
    pub plan: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct BranchArgs {
    /// Plan key of the master plan
    pub plan: String,

    /// Name of the branch plan as shown in Bamboo
    pub name: String,

    /// Repository branch to build, e.g. refs/heads/feature-x for git
    #[arg(long)]
    pub vcs_branch: String,
}

impl PlanCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            PlanSubcommand::List => self.list(global).await,
            PlanSubcommand::Enable(args) => self.enable(args, global).await,
            PlanSubcommand::Disable(args) => self.disable(args, global).await,
            PlanSubcommand::Branch(args) => self.branch(args, global).await,
        }
    }

    async fn list(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let params = global.query();
        let plans = client.all_plans(params.as_ref()).await?;

        let writer = global.writer();
        if writer.is_json() {
            return crate::output::write_json(&plans);
        }

        plan_table(&plans, writer.color_enabled()).print();
        println!("Showing {} plan(s)", plans.len());
        Ok(())
    }

    async fn enable(&self, args: &KeyArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let params = global.query();
        let enabled = client.enable_plan(&args.plan, params.as_ref()).await?;

        self.report(global, &args.plan, "enabled", enabled)
    }

    async fn disable(&self, args: &DisableArgs, global: &GlobalOptions) -> Result<()> {
        let prompt = format!("Disable plan {}?", args.plan);
        if !confirm_action(&prompt, args.yes, global.no_prompt)? {
            println!("{} Cancelled.", style("!").yellow());
            return Ok(());
        }

        let client = global.client()?;
        let params = global.query();
        let disabled = client.disable_plan(&args.plan, params.as_ref()).await?;

        self.report(global, &args.plan, "disabled", disabled)
    }

    async fn branch(&self, args: &BranchArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let key = client
            .create_branch_plan(&args.plan, &args.name, &args.vcs_branch)
            .await?;

        if global.json {
            let result = serde_json::json!({
                "plan": args.plan,
                "branch": args.name,
                "vcsBranch": args.vcs_branch,
                "key": key,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            global.writer().write_success(&format!(
                "Created branch plan {} ({}) for {}",
                style(&key).cyan(),
                args.name,
                args.vcs_branch
            ));
        }
        Ok(())
    }

    fn report(&self, global: &GlobalOptions, plan: &str, action: &str, success: bool) -> Result<()> {
        if global.json {
            let result = serde_json::json!({
                "success": success,
                "plan": plan,
                "action": action,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            global
                .writer()
                .write_success(&format!("Plan {} {}", style(plan).cyan(), action));
        }
        Ok(())
    }
}

fn plan_table(plans: &[Plan], color: bool) -> TableBuilder {
    TableBuilder::new()
        .color(color)
        .headers(["KEY", "NAME"])
        .rows(
            plans
                .iter()
                .map(|p| [p.key.clone(), truncate(&p.name, 60)]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_table_lists_every_plan() {
        let plans = vec![
            Plan {
                key: "AA-BB".into(),
                name: "Alpha".into(),
            },
            Plan {
                key: "CC-DD".into(),
                name: "Gamma".into(),
            },
        ];
        let rendered = plan_table(&plans, false).build().to_string();

        assert!(rendered.contains("AA-BB"));
        assert!(rendered.contains("Gamma"));
    }
}
