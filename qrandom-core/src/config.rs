// SPDX-License-Identifier: MIT
//
// Quantum Random SDK: Client for Quantum Randomness Services
// Copyright (c) 2025 Valer Bocan, PhD, CSSLP
// Email: valer.bocan@upt.ro
//
// Department of Computer and Information Technology
// Politehnica University of Timisoara
//
// https://github.com/vbocan/qrandom-sdk

//! Configuration management for the SDK client

use crate::{mapper::RangeMapping, Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Environment variable prefix used by [`ClientConfig::from_env`]
pub const ENV_PREFIX: &str = "QRANDOM_";

/// Client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Endpoint of the randomness service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key; a client built with one starts out initialized
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Value of the `User-Agent` header
    #[serde(default = "crate::default_user_agent")]
    pub user_agent: String,

    /// How raw integers are folded into a range
    #[serde(default)]
    pub range_mapping: RangeMapping,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            user_agent: crate::default_user_agent(),
            range_mapping: RangeMapping::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `QRANDOM_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit `QRANDOM_*` key/value pairs
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(|e| Error::Config(format!("Failed to parse environment variables: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid base_url '{}': {}", self.base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be > 0".to_string()));
        }

        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                return Err(Error::Config("api_key cannot be empty".to_string()));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("user_agent cannot be empty".to_string()));
        }

        Ok(())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    ///
    /// The timeout is stored in whole seconds, so any fractional part is
    /// rounded up: 500 ms becomes 1 s and 1.2 s becomes 2 s.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.timeout_secs = secs.max(1);
        self
    }

    pub fn with_range_mapping(mut self, range_mapping: RangeMapping) -> Self {
        self.range_mapping = range_mapping;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Default value functions
fn default_base_url() -> String {
    crate::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    crate::DEFAULT_TIMEOUT_SECS
}
