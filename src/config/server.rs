//
//  bamboo-cli
//  config/server.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server connection settings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `[server]` section of the configuration file.
///
/// # Fields
///
/// * `host` - Base URL of the Bamboo server, context path included
/// * `username` - Basic-auth user
/// * `password` - Basic-auth password or personal access token
///
/// Credentials are only used when both are set.
///
/// # Example
///
/// ```rust
/// use bamboo_cli::config::ServerConfig;
///
/// let server: ServerConfig = toml::from_str(r#"host = "https://ci.example.com""#).unwrap();
/// assert!(!server.has_credentials());
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

impl ServerConfig {
    /// Returns `true` when both a username and a password are set.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Overlays the values of `other` that are set.
    pub fn merge(&mut self, other: ServerConfig) {
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
    }
}

/// Normalizes a user-supplied host into a base URL.
///
/// Surrounding whitespace and trailing slashes are dropped and `http://` is
/// assumed when no scheme is given, matching Bamboo's default port-8085
/// deployments.
///
/// # Example
///
/// ```rust
/// use bamboo_cli::config::normalize_host;
///
/// assert_eq!(normalize_host("ci.example.com:8085/"), "http://ci.example.com:8085");
/// assert_eq!(normalize_host(" https://ci.example.com/bamboo "), "https://ci.example.com/bamboo");
/// ```
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("localhost:8085"), "http://localhost:8085");
        assert_eq!(normalize_host("https://ci.example.com/"), "https://ci.example.com");
    }

    #[test]
    fn test_merge_keeps_unset_values() {
        let mut base = ServerConfig {
            host: Some("http://a".into()),
            username: Some("file-user".into()),
            password: Some("file-pass".into()),
        };
        base.merge(ServerConfig {
            host: None,
            username: Some("flag-user".into()),
            password: None,
        });

        assert_eq!(base.host.as_deref(), Some("http://a"));
        assert_eq!(base.username.as_deref(), Some("flag-user"));
        assert_eq!(base.password.as_deref(), Some("file-pass"));
        assert!(base.has_credentials());
    }

    #[test]
    fn test_debug_masks_password() {
        let server = ServerConfig {
            host: Some("http://a".into()),
            username: Some("jdoe".into()),
            password: Some("s3cret".into()),
        };
        let debug = format!("{:?}", server);

        assert!(debug.contains("jdoe"));
        assert!(!debug.contains("s3cret"));
    }
}
