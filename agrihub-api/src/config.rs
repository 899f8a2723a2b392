use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ApiConfig::base_url`].
pub const ENV_API_URL: &str = "AGRIHUB_API_URL";
/// Environment variable overriding [`ApiConfig::timeout_secs`].
pub const ENV_API_TIMEOUT: &str = "AGRIHUB_API_TIMEOUT_SECS";

/// Connection settings for the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL all request paths are appended to (e.g. `https://api.example.com/api`).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 30,
            user_agent: format!("agrihub-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Defaults overlaid with `AGRIHUB_API_URL` and `AGRIHUB_API_TIMEOUT_SECS`.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_API_TIMEOUT) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                ApiError::Config(format!("{ENV_API_TIMEOUT} must be a number, got {raw:?}"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks that the base URL is absolute http(s) and the timeout is non-zero.
    pub fn validate(&self) -> ApiResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base_url must start with http:// or https://, got {url:?}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ApiError::Config("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}
