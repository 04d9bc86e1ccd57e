//! Connection settings for a graph database REST endpoint.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BatchResult;

/// Connection settings. Defaults match a local Neo4j server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database path under the server root.
    pub db: String,
    /// Content type sent with requests.
    pub content_type: String,
    /// Accept type sent with requests.
    pub accept_type: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 7474,
            db: "db/data".to_string(),
            content_type: "application/json".to_string(),
            accept_type: "application/json".to_string(),
        }
    }
}

impl GraphConfig {
    /// REST base URL of the database.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/{}", self.host, self.port, self.db)
    }

    /// URL of the batch resource.
    pub fn batch_endpoint(&self) -> String {
        format!("{}/batch", self.endpoint())
    }

    /// Load settings from a TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> BatchResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
