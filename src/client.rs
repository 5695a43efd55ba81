//! Client configuration: where the CDN lives and which project to address.
//!
//! A content API client knows its API host, project, and dataset. Image URLs
//! are served from the matching CDN host, so `https://api.<domain>` becomes
//! `https://cdn.<domain>`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// API host assumed when a client does not name one.
pub const DEFAULT_API_HOST: &str = "https://api.sanity.io";

/// Configuration as exposed by a content API client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default)]
    pub api_host: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub dataset: Option<String>,
}

/// The resolved triple image URLs are built from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    pub base_url: String,
    pub project_id: Option<String>,
    pub dataset: Option<String>,
}

/// Anything that can hand over a [`ClientConfig`].
pub trait ClientLike {
    fn client_config(&self) -> ClientConfig;
}

impl ClientLike for ClientConfig {
    fn client_config(&self) -> ClientConfig {
        self.clone()
    }
}

impl ClientConfig {
    /// Read a config from JSON.
    ///
    /// Accepts the config object itself, or an object carrying it under
    /// `clientConfig` or `config`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let inner = value
            .get("clientConfig")
            .or_else(|| value.get("config"))
            .filter(|v| v.is_object())
            .unwrap_or(value);
        serde_json::from_value(inner.clone()).map_err(|_| Error::InvalidOption {
            key: "clientConfig".to_owned(),
            reason: "expected an object with apiHost, projectId, and dataset",
        })
    }

    /// Derive the CDN base URL and project from this config.
    pub fn project_config(&self) -> ProjectConfig {
        let api_host = self.api_host.as_deref().unwrap_or(DEFAULT_API_HOST);
        ProjectConfig {
            base_url: cdn_host(api_host),
            project_id: self.project_id.clone(),
            dataset: self.dataset.clone(),
        }
    }
}

fn cdn_host(api_host: &str) -> String {
    match api_host.strip_prefix("https://api.") {
        Some(rest) => format!("https://cdn.{rest}"),
        None => api_host.to_owned(),
    }
}
