//
//  bamboo-cli
//  api/provenance.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Build Provenance Chains
//!
//! A Bamboo build that was triggered by another build ("child" plans in a
//! dependency chain) records its parent in the free-text build reason:
//!
//! ```text
//! Child of <a href="/browse/PROJ-CORE-12">PROJ-CORE-12</a>
//! ```
//!
//! The facts a user cares about (code changes, linked JIRA issues) belong to
//! the build at the top of that chain, so they are collected from every build
//! along it. This module splits the job into:
//!
//! - [`dependent_build`], a pure parser that extracts the parent identifier
//! - [`ProvenanceWalker`], an iterative walk that fetches each build once and
//!   merges their facts into a duplicate-free, ordered union
//!
//! ## Ordering
//!
//! The result lists the starting build's items first, followed by whatever
//! each ancestor adds that has not been seen yet.
//!
//! ## Termination
//!
//! A visited set stops cyclic chains (the walk ends once it comes back to a
//! build it already fetched) and the number of links followed is capped by
//! [`WalkLimits::max_chain_depth`](super::common::WalkLimits).

use std::collections::HashSet;
use std::future::Future;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::common::ApiError;

static CHILD_OF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Child of.*?<a\b[^>]*>\s*([^<]*?)\s*</a>").expect("valid provenance regex")
});

/// Extracts the dependent (parent) build identifier from a build reason.
///
/// The identifier is the text of the first anchor after the `Child of`
/// marker, whatever sits between the two. Returns `None` when the reason has
/// no marker, or when no non-empty anchor follows it.
///
/// # Example
///
/// ```rust
/// use bamboo_cli::api::provenance::dependent_build;
///
/// assert_eq!(
///     dependent_build(r#"Child of <a href="/browse/PROJ-CORE-12">PROJ-CORE-12</a>"#),
///     Some("PROJ-CORE-12".to_string())
/// );
/// assert_eq!(dependent_build("Manual run by <a>jdoe</a>"), None);
/// assert_eq!(dependent_build("Child of nothing in particular"), None);
/// ```
pub fn dependent_build(reason: &str) -> Option<String> {
    CHILD_OF
        .captures(reason)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|id| !id.is_empty())
}

/// The facts extracted from a single build response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFacts {
    /// Items carried by this build (contributor names, issue keys, ...).
    pub items: Vec<String>,
    /// The build's free-text reason, if the server sent one.
    pub build_reason: Option<String>,
}

impl BuildFacts {
    /// Returns the identifier of the build this one was triggered by.
    pub fn parent(&self) -> Option<String> {
        self.build_reason.as_deref().and_then(dependent_build)
    }
}

/// Walks a chain of dependent builds and unions their facts.
#[derive(Debug, Clone, Copy)]
pub struct ProvenanceWalker {
    max_depth: usize,
}

impl ProvenanceWalker {
    /// Creates a walker that follows at most `max_depth` parent links.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Collects the facts of `build` and of every build it descends from.
    ///
    /// `fetch` is called once per build in the chain, starting with `build`.
    ///
    /// # Errors
    ///
    /// - Any error returned by `fetch`, unchanged; nothing gathered so far is
    ///   returned with it
    /// - [`ApiError::ProvenanceTooDeep`] if the chain has more than
    ///   `max_depth` links
    pub async fn collect<F, Fut>(&self, build: &str, mut fetch: F) -> Result<Vec<String>, ApiError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<BuildFacts, ApiError>>,
    {
        let mut union: Vec<String> = Vec::new();
        let mut seen_items: HashSet<String> = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut next = Some(build.to_string());
        let mut links = 0usize;

        while let Some(current) = next.take() {
            if !visited.insert(current.clone()) {
                warn!(build, revisited = %current, "dependent build chain loops back on itself");
                break;
            }
            if links > self.max_depth {
                return Err(ApiError::ProvenanceTooDeep {
                    build: build.to_string(),
                    limit: self.max_depth,
                });
            }

            let facts = fetch(current.clone()).await?;
            next = facts.parent();
            debug!(build = %current, items = facts.items.len(), parent = ?next, "provenance step");

            for item in facts.items {
                if seen_items.insert(item.clone()) {
                    union.push(item);
                }
            }
            links += 1;
        }

        Ok(union)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn facts(items: &[&str], reason: Option<&str>) -> BuildFacts {
        BuildFacts {
            items: items.iter().map(|s| s.to_string()).collect(),
            build_reason: reason.map(str::to_string),
        }
    }

    fn chain(entries: Vec<(&str, BuildFacts)>) -> HashMap<String, BuildFacts> {
        entries
            .into_iter()
            .map(|(id, f)| (id.to_string(), f))
            .collect()
    }

    #[test]
    fn test_dependent_build_plain_anchor() {
        assert_eq!(
            dependent_build("Child of <a>plan2-99</a>"),
            Some("plan2-99".to_string())
        );
    }

    #[test]
    fn test_dependent_build_with_attributes_and_whitespace() {
        let reason = "Child of\n<a href=\"/browse/AA-BB-7\" title=\"x\"> AA-BB-7 </a>";
        assert_eq!(dependent_build(reason), Some("AA-BB-7".to_string()));
    }

    #[test]
    fn test_dependent_build_with_text_before_anchor() {
        assert_eq!(
            dependent_build("Child of: <a>plan2-99</a>"),
            Some("plan2-99".to_string())
        );
        assert_eq!(
            dependent_build(r#"Child of plan <a href="/browse/plan2-99">plan2-99</a>"#),
            Some("plan2-99".to_string())
        );
    }

    #[test]
    fn test_dependent_build_ignores_anchor_before_marker() {
        let reason = r#"Rebuilt by <a>jdoe</a>. Child of <a href="/browse/AA-BB-4">AA-BB-4</a>"#;
        assert_eq!(dependent_build(reason), Some("AA-BB-4".to_string()));
    }

    #[test]
    fn test_dependent_build_absent() {
        assert_eq!(dependent_build("Changes by <a>Jane Doe</a>"), None);
        assert_eq!(dependent_build(""), None);
        assert_eq!(dependent_build("Child of <a></a>"), None);
    }

    #[tokio::test]
    async fn test_union_is_self_first_then_parent_additions() {
        let builds = chain(vec![
            ("plan1-1", facts(&["AAA", "BBB"], Some("Child of <a>plan2-99</a>"))),
            ("plan2-99", facts(&["CCC", "BBB"], Some("Manual run"))),
        ]);

        let mut fetched = Vec::new();
        let result = ProvenanceWalker::new(10)
            .collect("plan1-1", |id| {
                fetched.push(id.clone());
                let found = builds.get(&id).cloned();
                async move {
                    found.ok_or(ApiError::Unreachable {
                        status: 404,
                        message: None,
                    })
                }
            })
            .await
            .unwrap();

        assert_eq!(result, vec!["AAA", "BBB", "CCC"]);
        assert_eq!(fetched, vec!["plan1-1", "plan2-99"]);
    }

    #[tokio::test]
    async fn test_root_build_deduplicates_its_own_items() {
        let result = ProvenanceWalker::new(10)
            .collect("root-1", |_| async {
                Ok(facts(&["Jane", "Jane", "John"], None))
            })
            .await
            .unwrap();

        assert_eq!(result, vec!["Jane", "John"]);
    }

    #[tokio::test]
    async fn test_parent_failure_aborts_chain() {
        let builds = chain(vec![(
            "child-2",
            facts(&["AAA"], Some("Child of <a>missing-1</a>")),
        )]);

        let result = ProvenanceWalker::new(10)
            .collect("child-2", |id| {
                let found = builds.get(&id).cloned();
                async move {
                    found.ok_or(ApiError::Unreachable {
                        status: 404,
                        message: None,
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_cycle_terminates_with_full_union() {
        let builds = chain(vec![
            ("a-1", facts(&["X"], Some("Child of <a>b-1</a>"))),
            ("b-1", facts(&["Y"], Some("Child of <a>a-1</a>"))),
        ]);

        let mut calls = 0;
        let result = ProvenanceWalker::new(10)
            .collect("a-1", |id| {
                calls += 1;
                let found = builds.get(&id).cloned().unwrap_or_default();
                async move { Ok(found) }
            })
            .await
            .unwrap();

        assert_eq!(result, vec!["X", "Y"]);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_depth_limit_is_enforced() {
        // Every build claims a fresh parent: n-0 <- n-1 <- n-2 ...
        let result = ProvenanceWalker::new(3)
            .collect("n-0", |id| {
                let depth: u32 = id.trim_start_matches("n-").parse().unwrap();
                let reason = format!("Child of <a>n-{}</a>", depth + 1);
                async move { Ok(facts(&[], Some(&reason))) }
            })
            .await;

        assert!(matches!(
            result,
            Err(ApiError::ProvenanceTooDeep { limit: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_chain_at_depth_limit_succeeds() {
        // n-0 <- n-1 <- n-2 <- n-3 (root): three links.
        let result = ProvenanceWalker::new(3)
            .collect("n-0", |id| {
                let depth: u32 = id.trim_start_matches("n-").parse().unwrap();
                let reason = (depth < 3).then(|| format!("Child of <a>n-{}</a>", depth + 1));
                async move { Ok(facts(&[id.as_str()], reason.as_deref())) }
            })
            .await
            .unwrap();

        assert_eq!(result, vec!["n-0", "n-1", "n-2", "n-3"]);
    }
}
