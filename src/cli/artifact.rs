//
//  bamboo-cli
//  cli/artifact.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shared artifact commands.
//!
//! ```bash
//! bamboo artifact get PROJ-CORE-12 report                  # writes ./report
//! bamboo artifact get PROJ-CORE-12 report -o out/report.zip
//! bamboo artifact get PROJ-CORE-12 report -o - | tar tz    # stdout
//! bamboo artifact cat PROJ-CORE-12 version.txt
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::util::format_size;

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct ArtifactCommand {
    #[command(subcommand)]
    pub command: ArtifactSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ArtifactSubcommand {
    /// Download a shared artifact
    #[command(visible_alias = "download")]
    Get(GetArgs),

    /// Print an artifact to stdout
    Cat(CatArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Build, e.g. PROJ-CORE-12
    pub build: String,

    /// Artifact name
    pub name: String,

    /// Destination file, `-` for stdout (default: ./<NAME>)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CatArgs {
    /// Build, e.g. PROJ-CORE-12
    pub build: String,

    /// Artifact name
    pub name: String,
}

/// Where a download goes.
#[derive(Debug, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

impl GetArgs {
    fn destination(&self) -> Destination {
        match &self.output {
            Some(path) if path.as_os_str() == "-" => Destination::Stdout,
            Some(path) => Destination::File(path.clone()),
            None => Destination::File(PathBuf::from(&self.name)),
        }
    }
}

impl ArtifactCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ArtifactSubcommand::Get(args) => self.get(args, global).await,
            ArtifactSubcommand::Cat(args) => self.cat(args, global).await,
        }
    }

    async fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let artifact = client.artifact_stream(&args.build, &args.name).await?;

        let path = match args.destination() {
            Destination::Stdout => {
                let mut stdout = tokio::io::stdout();
                artifact.copy_to(&mut stdout, |_| {}).await?;
                return Ok(());
            }
            Destination::File(path) => path,
        };

        create_parent(&path)?;
        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let pb = if global.json {
            ProgressBar::hidden()
        } else {
            progress_bar(artifact.content_length())
        };
        let size = artifact
            .copy_to(&mut file, |n| pb.inc(n as u64))
            .await?;
        pb.finish_and_clear();

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "build": args.build,
                "name": args.name,
                "path": path.display().to_string(),
                "size": size,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Downloaded {} to {}",
                style("✓").green(),
                style(&args.name).cyan(),
                path.display()
            );
            println!("  Size: {}", format_size(size));
        }
        Ok(())
    }

    async fn cat(&self, args: &CatArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let content = client.artifact_content(&args.build, &args.name).await?;

        if global.json {
            let result = serde_json::json!({
                "build": args.build,
                "name": args.name,
                "content": String::from_utf8_lossy(&content),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&content)?;
            stdout.flush()?;
        }
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))
        }
        _ => Ok(()),
    }
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(total) => {
            let pb = ProgressBar::new(total);
            if let Ok(bar) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
            ) {
                pb.set_style(bar.progress_chars("#>-"));
            }
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.green} {bytes}") {
                pb.set_style(spinner);
            }
            pb
        }
    }
}
