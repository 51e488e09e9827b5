// Client configuration.
// Holds credentials, project scoping, cache TTL and base URL, loadable from the environment.

use std::env;
use std::time::Duration;

use crate::error::{CakewalkError, Result};

/// Default cache TTL: 5 minutes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

pub const ENV_API_KEY: &str = "CAKEWALK_API_KEY";
pub const ENV_PROJECT_ID: &str = "CAKEWALK_PROJECT_ID";
pub const ENV_BASE_URL: &str = "CAKEWALK_BASE_URL";
pub const ENV_CACHE_TTL: &str = "CAKEWALK_CACHE_TTL";

/// Optional client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// How long a successful response stays fresh. Zero disables reuse.
    pub cache_ttl: Duration,
    /// Overrides the flavor's default API origin.
    pub base_url: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            base_url: None,
        }
    }
}

impl ClientOptions {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_ttl_secs(self, secs: u64) -> Self {
        self.with_cache_ttl(Duration::from_secs(secs))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Everything needed to construct a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Organization API key, sent as a bearer token.
    pub api_key: String,
    /// Project to read posts from. Required by the posts API only.
    pub project_id: Option<String>,
    pub options: ClientOptions,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: None,
            options: ClientOptions::default(),
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Load configuration from `CAKEWALK_*` environment variables.
    ///
    /// `CAKEWALK_API_KEY` is required. `CAKEWALK_PROJECT_ID`, `CAKEWALK_BASE_URL`
    /// and `CAKEWALK_CACHE_TTL` (seconds) are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(ENV_API_KEY).ok_or(CakewalkError::MissingEnv(ENV_API_KEY))?;

        let mut options = ClientOptions::default();
        if let Some(base_url) = non_empty(ENV_BASE_URL) {
            options.base_url = Some(base_url);
        }
        if let Some(ttl) = non_empty(ENV_CACHE_TTL) {
            let secs: u64 = ttl.trim().parse().map_err(|_| {
                CakewalkError::Config(format!(
                    "{} must be whole seconds, got {:?}",
                    ENV_CACHE_TTL, ttl
                ))
            })?;
            options.cache_ttl = Duration::from_secs(secs);
        }

        Ok(Self {
            api_key,
            project_id: non_empty(ENV_PROJECT_ID),
            options,
        })
    }
}
