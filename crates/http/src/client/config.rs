//! Client configuration

use super::StayNestClientBuilder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings, usually read from the `api` section of the CLI config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, including the version prefix
    pub base_url: String,
    /// Per-request timeout in seconds (0 disables it)
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/api/v1";

    /// Builder preloaded with these settings
    pub fn builder(&self) -> StayNestClientBuilder {
        let mut builder = StayNestClientBuilder::default().base_url(&self.base_url);
        if self.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(self.timeout_secs));
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        builder
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: None,
        }
    }
}
