use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.marketstack.com/v1";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
}

/// Where the market data comes from, and how to ask for it.
///
/// Read from the environment (`.env` is loaded by the binary beforehand):
///
/// ```text
/// MARKETSTACK_ACCESS_KEY  - required
/// MARKETSTACK_URL         - defaults to https://api.marketstack.com/v1
/// USER_AGENT              - defaults to runnr/<version>
/// ```
///
/// ```rust
/// use runnr_client::Config;
///
/// let config = Config::from_lookup(|key| {
///     (key == "MARKETSTACK_ACCESS_KEY").then(|| "abc123".to_string())
/// })
/// .unwrap();
/// assert_eq!(config.base_url, "https://api.marketstack.com/v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub access_key: String,
    pub user_agent: String,
}

impl Config {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_key: access_key.into(),
            user_agent: default_user_agent(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key-value source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let access_key =
            var("MARKETSTACK_ACCESS_KEY").ok_or(ConfigError::MissingVar("MARKETSTACK_ACCESS_KEY"))?;
        let base_url = var("MARKETSTACK_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let user_agent = var("USER_AGENT").unwrap_or_else(default_user_agent);

        Ok(Self {
            base_url,
            access_key,
            user_agent,
        })
    }
}

fn default_user_agent() -> String {
    format!("runnr/{}", env!("CARGO_PKG_VERSION"))
}
