//
//  bamboo-cli
//  api/results.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Build result API types and operations.
//!
//! Bamboo exposes build results under `/rest/api/latest/result/`. A plan key
//! (`PROJ-PLAN`) addresses the plan's result collection, which is paginated;
//! a build identifier (`PROJ-PLAN/12` or `PROJ-PLAN-12`) addresses a single
//! build.
//!
//! # Result Lifecycle
//!
//! ```text
//! Queued -> Pending -> InProgress -> Finished
//!                                \-> NotBuilt
//! ```
//!
//! `lifeCycleState` tracks the lifecycle above; `state` holds the outcome
//! (`Successful`, `Failed`, `Unknown`).
//!
//! # Operations
//!
//! | Method | Returns |
//! |--------|---------|
//! | [`BambooClient::latest_successful_build_number`] | number of the newest green build |
//! | [`BambooClient::latest_build_status`] | state and number of the newest build |
//! | [`BambooClient::build_status`] | lifecycle state of one build |
//! | [`BambooClient::build_state`] | outcome of one build |
//! | [`BambooClient::changes_from_build`] | contributors, following dependent builds |
//! | [`BambooClient::jira_issues_from_build`] | JIRA issue keys, following dependent builds |

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::client::BambooClient;
use super::common::{page_query, start_offset, ApiError, Page, PageWalker, QueryParams};
use super::provenance::{BuildFacts, ProvenanceWalker};

/// Outcome of a build.
///
/// Unrecognised values are kept verbatim in [`BuildState::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildState {
    Successful,
    Failed,
    #[default]
    Unknown,
    Other(String),
}

impl BuildState {
    /// Returns `true` for a green build.
    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Successful)
    }
}

impl From<String> for BuildState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Successful" => Self::Successful,
            "Failed" => Self::Failed,
            "Unknown" => Self::Unknown,
            _ => Self::Other(value),
        }
    }
}

impl From<BuildState> for String {
    fn from(state: BuildState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Successful => f.write_str("Successful"),
            Self::Failed => f.write_str("Failed"),
            Self::Unknown => f.write_str("Unknown"),
            Self::Other(state) => f.write_str(state),
        }
    }
}

/// A single build result.
///
/// Only the fields the client works with are modelled; everything else in
/// the payload is ignored.
///
/// # Fields
///
/// * `key` - Full build key, e.g. `PROJ-PLAN-12`
/// * `plan_name` - Display name of the owning plan
/// * `number` - Build number (sent as a JSON number or string)
/// * `state` - Build outcome
/// * `life_cycle_state` - Where the build is in its lifecycle
/// * `build_reason` - Free text (HTML) explaining why the build ran
/// * `changes` - Present when requested with `expand=changes`
/// * `jira_issues` - Present when requested with `expand=jiraIssues`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,

    #[serde(default, deserialize_with = "build_number")]
    pub number: String,

    #[serde(default)]
    pub state: BuildState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_cycle_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<ChangeList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_issues: Option<IssueList>,
}

impl BuildResult {
    /// Full names of the change authors, in payload order.
    pub fn change_authors(&self) -> Vec<String> {
        self.changes
            .iter()
            .flat_map(|c| c.change.iter())
            .map(|c| c.full_name.clone())
            .collect()
    }

    /// Keys of the linked JIRA issues, in payload order.
    pub fn issue_keys(&self) -> Vec<String> {
        self.jira_issues
            .iter()
            .flat_map(|i| i.issue.iter())
            .map(|i| i.key.clone())
            .collect()
    }
}

/// The `changes` container of an expanded build result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeList {
    #[serde(default)]
    pub change: Vec<Change>,
}

/// A single commit included in a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub full_name: String,
}

/// The `jiraIssues` container of an expanded build result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueList {
    #[serde(default)]
    pub issue: Vec<Issue>,
}

/// A JIRA issue linked to a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
}

/// State and number of the most recent build of a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildSummary {
    pub state: BuildState,
    pub number: String,
}

/// Body of `GET /rest/api/latest/result/{planKey}.json`.
#[derive(Debug, Deserialize)]
struct ResultsEnvelope {
    #[serde(default)]
    results: Option<ResultPage>,
}

#[derive(Debug, Deserialize)]
struct ResultPage {
    #[serde(default)]
    size: u32,
    #[serde(default, rename = "max-result")]
    max_result: u32,
    #[serde(default, rename = "start-index")]
    start_index: u32,
    #[serde(default)]
    result: Vec<BuildResult>,
}

impl ResultsEnvelope {
    /// Converts the envelope into a page, rejecting an empty one.
    fn into_page(self) -> Result<Page<BuildResult>, ApiError> {
        match self.results {
            Some(page) if !page.result.is_empty() => Ok(Page::new(
                page.result,
                page.size,
                page.max_result,
                page.start_index,
            )),
            _ => Err(ApiError::NoResults),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LifeCycleOnly {
    #[serde(rename = "lifeCycleState")]
    life_cycle_state: String,
}

#[derive(Debug, Deserialize)]
struct StateOnly {
    state: BuildState,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

fn build_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(s) => s,
    })
}

fn result_path(id: &str) -> String {
    format!("/rest/api/latest/result/{}.json", id)
}

fn expand(what: &str) -> QueryParams {
    QueryParams::from([("expand".to_string(), what.to_string())])
}

impl BambooClient {
    async fn result_page(
        &self,
        plan: &str,
        params: Option<&QueryParams>,
        offset: u32,
    ) -> Result<Page<BuildResult>, ApiError> {
        let envelope: ResultsEnvelope = self
            .get_json(&result_path(plan), &page_query(params, offset))
            .await?;
        envelope.into_page()
    }

    /// Returns the number of the newest successful build of `plan`.
    ///
    /// Result pages are walked newest first; the walk stops at the first
    /// page holding a successful build. `params` is forwarded on every page
    /// request, and its `start-index` (if any) sets where the walk begins.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NoResults`] if a page carries no results
    /// - [`ApiError::NoSuccessfulBuild`] if no page holds a successful build
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bamboo_cli::api::BambooClient;
    ///
    /// # async fn run() -> Result<(), bamboo_cli::api::ApiError> {
    /// let client = BambooClient::new(Some("https://ci.example.com"), None, None)?;
    /// let number = client.latest_successful_build_number("PROJ-PLAN", None).await?;
    /// println!("last green build: #{}", number);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn latest_successful_build_number(
        &self,
        plan: &str,
        params: Option<&QueryParams>,
    ) -> Result<String, ApiError> {
        PageWalker::new(self.limits().max_pages)
            .find_first(
                start_offset(params),
                |offset| self.result_page(plan, params, offset),
                |build| build.state.is_successful(),
            )
            .await?
            .map(|build| build.number)
            .ok_or(ApiError::NoSuccessfulBuild)
    }

    /// Returns the state and number of the newest build of `plan`.
    pub async fn latest_build_status(&self, plan: &str) -> Result<BuildSummary, ApiError> {
        let envelope: ResultsEnvelope = self
            .get_json(&result_path(plan), &QueryParams::new())
            .await?;
        let latest = envelope
            .into_page()?
            .items
            .into_iter()
            .next()
            .ok_or(ApiError::NoResults)?;

        Ok(BuildSummary {
            state: latest.state,
            number: latest.number,
        })
    }

    /// Returns the lifecycle state (`Finished`, `InProgress`, ...) of a build.
    pub async fn build_status(&self, build: &str) -> Result<String, ApiError> {
        let body: LifeCycleOnly = self
            .get_json(&result_path(build), &QueryParams::new())
            .await?;
        Ok(body.life_cycle_state)
    }

    /// Returns the outcome of a build.
    pub async fn build_state(&self, build: &str) -> Result<BuildState, ApiError> {
        let body: StateOnly = self
            .get_json(&result_path(build), &QueryParams::new())
            .await?;
        Ok(body.state)
    }

    /// Returns the authors of the changes in `build` and in every build it
    /// was triggered by.
    ///
    /// Names appear once each, the requested build's first.
    pub async fn changes_from_build(&self, build: &str) -> Result<Vec<String>, ApiError> {
        self.walk_provenance(build, "changes", BuildResult::change_authors)
            .await
    }

    /// Returns the JIRA issue keys linked to `build` and to every build it
    /// was triggered by.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bamboo_cli::api::BambooClient;
    ///
    /// # async fn run() -> Result<(), bamboo_cli::api::ApiError> {
    /// let client = BambooClient::new(None, None, None)?;
    /// for key in client.jira_issues_from_build("PROJ-PLAN/12").await? {
    ///     println!("{}", key);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn jira_issues_from_build(&self, build: &str) -> Result<Vec<String>, ApiError> {
        self.walk_provenance(build, "jiraIssues", BuildResult::issue_keys)
            .await
    }

    async fn walk_provenance(
        &self,
        build: &str,
        expansion: &str,
        extract: fn(&BuildResult) -> Vec<String>,
    ) -> Result<Vec<String>, ApiError> {
        let query = expand(expansion);
        ProvenanceWalker::new(self.limits().max_chain_depth)
            .collect(build, |id| {
                let query = &query;
                async move {
                    let result: BuildResult = self.get_json(&result_path(&id), query).await?;
                    Ok(BuildFacts {
                        items: extract(&result),
                        build_reason: result.build_reason,
                    })
                }
            })
            .await
    }
}
