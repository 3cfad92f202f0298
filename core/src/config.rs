//! Process-wide client configuration.
//!
//! Read once at startup from `LOYALTY_*` environment variables, after an
//! optional `.env` file has been loaded. The base URL stays fixed for the
//! lifetime of the `LoyaltyService` built from it.

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

const ENV_PREFIX: &str = "LOYALTY_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment configuration: {0}")]
    Env(#[from] envy::Error),

    #[error("LOYALTY_BASE_URL must not be empty")]
    EmptyBaseUrl,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://10.0.2.2:8080`. Set via `LOYALTY_BASE_URL`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl ClientConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: ClientConfig = envy::prefixed(ENV_PREFIX).from_env()?;
        config.validated()
    }

    /// Build from explicit `(name, value)` pairs, using the same prefix and
    /// defaults as [`ClientConfig::load`].
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: ClientConfig = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        config.validated()
    }

    /// Replace the base URL when `base_url` is given, e.g. from a command-line
    /// flag, keeping the same validation.
    pub fn with_base_url(self, base_url: Option<String>) -> Result<Self, ConfigError> {
        match base_url {
            Some(base_url) => Self { base_url }.validated(),
            None => Ok(self),
        }
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(self)
    }
}
