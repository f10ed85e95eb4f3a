//
//  bamboo-cli
//  api/plans.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Plan API types and operations.
//!
//! A Bamboo plan is addressed by its composite key, `PROJECT-PLAN`. This
//! module lists plans and performs the state-changing plan operations:
//! queueing a build, enabling and disabling a plan, and creating a plan
//! branch.
//!
//! # Endpoints
//!
//! | Method | Verb | Path |
//! |--------|------|------|
//! | [`BambooClient::all_plans`] | GET | `/rest/api/latest/plan.json` |
//! | [`BambooClient::queue_build`] | POST | `/rest/api/latest/queue/{build}.json` |
//! | [`BambooClient::enable_plan`] | POST | `/rest/api/latest/plan/{plan}/enable.json` |
//! | [`BambooClient::disable_plan`] | DELETE | `/rest/api/latest/plan/{plan}/enable.json` |
//! | [`BambooClient::create_branch_plan`] | PUT | `/rest/api/latest/plan/{plan}/branch/{name}.json` |
//!
//! The state-changing calls accept both `200 OK` and `204 No Content`.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::BambooClient;
use super::common::{page_query, start_offset, ApiError, Page, PageWalker, QueryParams};

/// A build plan.
///
/// # Example
///
/// ```rust
/// use bamboo_cli::api::plans::Plan;
///
/// let plan: Plan = serde_json::from_str(r#"{"key":"PROJ-CORE","name":"Project - Core","enabled":true}"#).unwrap();
/// assert_eq!(plan.key, "PROJ-CORE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Composite key, `PROJECT-PLAN`.
    pub key: String,

    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Body of `GET /rest/api/latest/plan.json`.
#[derive(Debug, Deserialize)]
struct PlansEnvelope {
    #[serde(default)]
    plans: Option<PlanPage>,
}

#[derive(Debug, Deserialize)]
struct PlanPage {
    #[serde(default)]
    size: u32,
    #[serde(default, rename = "max-result")]
    max_result: u32,
    #[serde(default, rename = "start-index")]
    start_index: u32,
    #[serde(default)]
    plan: Vec<Plan>,
}

impl PlansEnvelope {
    fn into_page(self) -> Result<Page<Plan>, ApiError> {
        match self.plans {
            Some(page) if !page.plan.is_empty() => Ok(Page::new(
                page.plan,
                page.size,
                page.max_result,
                page.start_index,
            )),
            _ => Err(ApiError::NoPlans),
        }
    }
}

/// Optional settings for a queued build.
///
/// Sent as an urlencoded form body; when every field is unset no body is
/// sent at all.
///
/// # Fields
///
/// * `stage` - Run the plan up to and including this stage
/// * `execute_all_stages` - Run manual stages too
/// * `custom_revision` - Build this VCS revision instead of the latest one
///
/// # Example
///
/// ```rust
/// use bamboo_cli::api::plans::QueueOptions;
///
/// let options = QueueOptions {
///     execute_all_stages: Some(true),
///     ..Default::default()
/// };
/// assert!(!options.is_empty());
/// assert!(QueueOptions::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_all_stages: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_revision: Option<String>,
}

impl QueueOptions {
    /// Returns `true` when no option is set.
    pub fn is_empty(&self) -> bool {
        self.stage.is_none() && self.execute_all_stages.is_none() && self.custom_revision.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct CreatedBranch {
    key: String,
}

fn params_or_empty(params: Option<&QueryParams>) -> QueryParams {
    params.cloned().unwrap_or_default()
}

impl BambooClient {
    /// Lists every plan visible to the client, walking all pages.
    ///
    /// `params` is forwarded on every page request and may carry a
    /// `start-index` to begin part-way through the collection.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoPlans`] if a page holds no plans.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bamboo_cli::api::BambooClient;
    ///
    /// # async fn run() -> Result<(), bamboo_cli::api::ApiError> {
    /// let client = BambooClient::new(None, None, None)?;
    /// for plan in client.all_plans(None).await? {
    ///     println!("{}\t{}", plan.key, plan.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn all_plans(&self, params: Option<&QueryParams>) -> Result<Vec<Plan>, ApiError> {
        PageWalker::new(self.limits().max_pages)
            .collect_all(start_offset(params), |offset| async move {
                let envelope: PlansEnvelope = self
                    .get_json("/rest/api/latest/plan.json", &page_query(params, offset))
                    .await?;
                envelope.into_page()
            })
            .await
    }

    /// Queues a build of `build` (a plan key, optionally with a build number
    /// to re-run) and returns the server's raw response body.
    pub async fn queue_build(
        &self,
        build: &str,
        params: Option<&QueryParams>,
        options: Option<&QueueOptions>,
    ) -> Result<String, ApiError> {
        let form = options.filter(|o| !o.is_empty());
        self.write(
            Method::POST,
            &format!("/rest/api/latest/queue/{}.json", build),
            &params_or_empty(params),
            form,
        )
        .await
    }

    /// Enables a plan. Returns `true` on success.
    pub async fn enable_plan(&self, plan: &str, params: Option<&QueryParams>) -> Result<bool, ApiError> {
        self.toggle_plan(Method::POST, plan, params).await
    }

    /// Disables a plan. Returns `true` on success.
    pub async fn disable_plan(&self, plan: &str, params: Option<&QueryParams>) -> Result<bool, ApiError> {
        self.toggle_plan(Method::DELETE, plan, params).await
    }

    async fn toggle_plan(
        &self,
        method: Method,
        plan: &str,
        params: Option<&QueryParams>,
    ) -> Result<bool, ApiError> {
        self.write(
            method,
            &format!("/rest/api/latest/plan/{}/enable.json", plan),
            &params_or_empty(params),
            None::<&QueueOptions>,
        )
        .await?;
        Ok(true)
    }

    /// Creates a branch plan of `plan` named `branch` that builds
    /// `vcs_branch` (for git, something like `refs/heads/feature-x`).
    ///
    /// Returns the key of the new branch plan.
    pub async fn create_branch_plan(
        &self,
        plan: &str,
        branch: &str,
        vcs_branch: &str,
    ) -> Result<String, ApiError> {
        let query = QueryParams::from([("vcsBranch".to_string(), vcs_branch.to_string())]);
        let body = self
            .write(
                Method::PUT,
                &format!("/rest/api/latest/plan/{}/branch/{}.json", plan, branch),
                &query,
                None::<&QueueOptions>,
            )
            .await?;
        let created: CreatedBranch = serde_json::from_str(&body)?;
        Ok(created.key)
    }
}
