//
//  bamboo-cli
//  cli/search.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Entity search.
//!
//! ```bash
//! bamboo search branches -q masterPlanKey=PROJ-CORE -q includeMasterBranch=false
//! bamboo search plans -q searchTerm=core --json
//! ```

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use crate::output::{truncate, write_json, TableBuilder};
use crate::util::parse_key_value;

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Entity to search: users, authors, plans, branches, projects, versions
    pub entity: String,

    /// Search criterion (repeatable), e.g. masterPlanKey=PROJ-CORE
    #[arg(long = "query", short = 'q', value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub criteria: Vec<(String, String)>,
}

impl SearchCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;

        let mut params = global.query().unwrap_or_default();
        params.extend(self.criteria.iter().cloned());
        let params = (!params.is_empty()).then_some(params);

        let hits = client.search(&self.entity, params.as_ref()).await?;

        if global.json {
            return write_json(&hits);
        }
        if hits.is_empty() {
            println!("No {} found.", self.entity);
            return Ok(());
        }

        let color = global.writer().color_enabled();
        hits_table(&hits, color).print();
        println!("Showing {} result(s)", hits.len());
        Ok(())
    }
}

/// Tabulates search hits, one column per top-level field of the first hit.
fn hits_table(hits: &[Value], color: bool) -> TableBuilder {
    let columns: Vec<String> = hits
        .first()
        .and_then(Value::as_object)
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default();

    if columns.is_empty() {
        return TableBuilder::new()
            .color(color)
            .headers(["RESULT"])
            .rows(hits.iter().map(|hit| [cell(hit)]));
    }

    TableBuilder::new()
        .color(color)
        .headers(columns.iter().map(|c| c.to_uppercase()))
        .rows(hits.iter().map(|hit| {
            columns
                .iter()
                .map(|c| hit.get(c).map(cell).unwrap_or_default())
                .collect::<Vec<_>>()
        }))
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => truncate(s, 60),
        Value::Null => "-".to_string(),
        other => truncate(&other.to_string(), 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hits_table_uses_first_hit_fields() {
        let hits = vec![
            json!({"key": "AA-BB1", "branchName": "feature-a"}),
            json!({"key": "AA-BB2", "branchName": "feature-b", "extra": true}),
        ];
        let rendered = hits_table(&hits, false).build().to_string();

        assert!(rendered.contains("BRANCHNAME"));
        assert!(rendered.contains("feature-b"));
        assert!(!rendered.contains("EXTRA"));
    }

    #[test]
    fn test_scalar_hits_get_single_column() {
        let hits = vec![json!("jdoe"), json!(null)];
        let rendered = hits_table(&hits, false).build().to_string();

        assert!(rendered.contains("RESULT"));
        assert!(rendered.contains("jdoe"));
    }
}
