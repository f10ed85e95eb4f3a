//
//  bamboo-cli
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Small helpers shared by the commands.

use anyhow::{bail, Result};

use crate::api::QueryParams;

/// Parses a `KEY=VALUE` command-line argument.
///
/// Only the first `=` splits; the value may itself contain `=`. Used as a
/// clap `value_parser`.
///
/// # Example
///
/// ```rust
/// use bamboo_cli::util::parse_key_value;
///
/// assert_eq!(
///     parse_key_value("os_authType=basic").unwrap(),
///     ("os_authType".to_string(), "basic".to_string())
/// );
/// assert!(parse_key_value("novalue").is_err());
/// ```
pub fn parse_key_value(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => bail!("expected KEY=VALUE, got '{}'", arg),
    }
}

/// Collects parsed `KEY=VALUE` pairs into query parameters.
///
/// Later pairs win. Returns `None` when there are none, so callers can pass
/// the result straight to an API method.
pub fn query_params(pairs: &[(String, String)]) -> Option<QueryParams> {
    if pairs.is_empty() {
        return None;
    }
    Some(pairs.iter().cloned().collect())
}

/// Formats a byte count with binary units.
///
/// # Example
///
/// ```rust
/// use bamboo_cli::util::format_size;
///
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(1073741824), "1.0 GB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value_keeps_equals_in_value() {
        assert_eq!(
            parse_key_value("searchTerm=a=b").unwrap(),
            ("searchTerm".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_value("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn test_query_params_last_wins() {
        assert!(query_params(&[]).is_none());

        let params = query_params(&[
            ("a".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string()),
        ])
        .unwrap();
        assert_eq!(params.get("a").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
