use std::fmt;
use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

use crate::data::auth::Credentials;
use crate::error::{Error, Result};

pub const DEFAULT_AUTH_URL: &str = "https://api.backblazeb2.com/b2api/v1/b2_authorize_account";

/// Lifetime assumed for an authorization token (12 hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 12 * 60 * 60;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Prefix of environment variables read by [`ClientConfig::load`].
pub const ENV_PREFIX: &str = "B2_";

fn default_auth_url() -> String { DEFAULT_AUTH_URL.to_string() }

fn default_token_ttl_secs() -> u64 { DEFAULT_TOKEN_TTL_SECS }

fn default_connect_timeout_secs() -> u64 { DEFAULT_CONNECT_TIMEOUT_SECS }

fn default_user_agent() -> String { format!("b2cloud/{}", env!("CARGO_PKG_VERSION")) }

/// Client configuration.
///
/// Built programmatically with [`ClientConfig::new`] or loaded with
/// [`ClientConfig::load`] from an optional TOML file overlaid by `B2_*`
/// environment variables.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use b2cloud::ClientConfig;
///
/// let config = ClientConfig::new("account-id", "application-key")
///     .token_ttl(Duration::from_secs(3600))
///     .request_timeout(Duration::from_secs(120));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub account_id: String,
    pub application_key: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Seconds a fresh authorization is served from cache.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Seconds a bucket listing is trusted. `None` keeps entries until a
    /// lookup misses.
    #[serde(default)]
    pub bucket_cache_ttl_secs: Option<u64>,

    /// Whole-request timeout applied by the HTTP client. `None` disables it.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("account_id", &self.account_id)
            .field("application_key", &"<redacted>")
            .field("auth_url", &self.auth_url)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bucket_cache_ttl_secs", &self.bucket_cache_ttl_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(account_id: impl Into<String>, application_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            application_key: application_key.into(),
            auth_url: default_auth_url(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bucket_cache_ttl_secs: None,
            request_timeout_secs: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }

    /// Configuration sources in precedence order: TOML file, then `B2_*`
    /// environment variables.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: ClientConfig = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(Error::InvalidConfig("account_id must not be empty".into()));
        }
        if self.application_key.is_empty() {
            return Err(Error::InvalidConfig("application_key must not be empty".into()));
        }
        url::Url::parse(&self.auth_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.auth_url)))?;
        Ok(())
    }

    #[must_use]
    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    #[must_use]
    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl_secs = ttl.as_secs();
        self
    }

    #[must_use]
    pub fn bucket_cache_ttl(mut self, ttl: Duration) -> Self {
        self.bucket_cache_ttl_secs = Some(ttl.as_secs());
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = Some(timeout.as_secs());
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_secs = timeout.as_secs();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.account_id.clone(), self.application_key.clone())
    }

    pub fn token_ttl_duration(&self) -> Duration { Duration::from_secs(self.token_ttl_secs) }

    pub fn bucket_cache_ttl_duration(&self) -> Option<Duration> {
        self.bucket_cache_ttl_secs.map(Duration::from_secs)
    }

    pub fn request_timeout_duration(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
