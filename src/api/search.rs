//
//  bamboo-cli
//  api/search.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Entity search.
//!
//! `GET /rest/api/latest/search/{entity}.json` searches one entity type
//! (`users`, `authors`, `plans`, `branches`, `projects`, `versions`). The
//! criteria are plain query parameters whose names depend on the entity, e.g.
//! `masterPlanKey` for branches, so they are passed through untouched and the
//! matches come back as untyped JSON.

use serde::Deserialize;
use serde_json::Value;

use super::client::BambooClient;
use super::common::{ApiError, QueryParams};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    search_results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    #[serde(default)]
    search_entity: Value,
}

impl BambooClient {
    /// Searches `entity` with the given criteria and returns each hit's
    /// `searchEntity` object.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bamboo_cli::api::{BambooClient, QueryParams};
    ///
    /// # async fn run() -> Result<(), bamboo_cli::api::ApiError> {
    /// let client = BambooClient::new(None, None, None)?;
    /// let criteria = QueryParams::from([("masterPlanKey".to_string(), "PROJ-CORE".to_string())]);
    /// for branch in client.search("branches", Some(&criteria)).await? {
    ///     println!("{}", branch["key"]);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(
        &self,
        entity: &str,
        params: Option<&QueryParams>,
    ) -> Result<Vec<Value>, ApiError> {
        let response: SearchResponse = self
            .get_json(
                &format!("/rest/api/latest/search/{}.json", entity),
                &params.cloned().unwrap_or_default(),
            )
            .await?;

        Ok(response
            .search_results
            .into_iter()
            .map(|hit| hit.search_entity)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_search_unwraps_entities() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/latest/search/branches.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("masterPlanKey".into(), "AA-BB".into()),
                Matcher::UrlEncoded("includeMasterBranch".into(), "false".into()),
            ]))
            .with_body(
                r#"{"size":2,"searchResults":[
                    {"id":"AA-BB1","searchEntity":{"key":"AA-BB1","branchName":"feature-a"}},
                    {"id":"AA-BB2","searchEntity":{"key":"AA-BB2","branchName":"feature-b"}}]}"#,
            )
            .create_async()
            .await;

        let criteria = QueryParams::from([
            ("masterPlanKey".to_string(), "AA-BB".to_string()),
            ("includeMasterBranch".to_string(), "false".to_string()),
        ]);
        let client = BambooClient::new(Some(&server.url()), None, None).unwrap();
        let hits = client.search("branches", Some(&criteria)).await.unwrap();

        assert_eq!(
            hits,
            vec![
                json!({"key": "AA-BB1", "branchName": "feature-a"}),
                json!({"key": "AA-BB2", "branchName": "feature-b"}),
            ]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_without_results() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/search/users.json")
            .with_body(r#"{"size":0}"#)
            .create_async()
            .await;

        let client = BambooClient::new(Some(&server.url()), None, None).unwrap();
        assert!(client.search("users", None).await.unwrap().is_empty());
    }
}
