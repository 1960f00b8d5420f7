//! Client configuration.
//!
//! A `ClientConfig` can be deserialized from any serde source (the caller's
//! own config file, for instance) or read from `BLB_*` environment variables.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ApiError;

pub const ENDPOINT_ENV: &str = "BLB_ENDPOINT";
pub const TIMEOUT_ENV: &str = "BLB_TIMEOUT_SECS";
pub const USER_AGENT_ENV: &str = "BLB_USER_AGENT";

pub fn default_user_agent() -> String {
    format!("blb-core/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `http://blb.bj.baidubce.com`.
    pub endpoint: String,
    /// Overall per-request timeout. `None` leaves it to the transport.
    #[serde(default, rename = "timeout_secs", deserialize_with = "de_timeout")]
    pub timeout: Option<Duration>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn de_timeout<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}

impl ClientConfig {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout: None,
            user_agent: default_user_agent(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let endpoint = lookup(ENDPOINT_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENDPOINT_ENV} is not set")))?;
        let mut config = Self::new(endpoint.trim());

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ApiError::Config(format!("{TIMEOUT_ENV}={raw}: {e}")))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(user_agent) = lookup(USER_AGENT_ENV) {
            config.user_agent = user_agent;
        }
        Ok(config)
    }
}
