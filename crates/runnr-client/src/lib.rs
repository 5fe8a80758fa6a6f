pub mod config;
pub mod dedupe;
pub mod error;
pub mod marketstack;

pub use crate::config::{Config, ConfigError};
pub use crate::dedupe::{Deduplicated, InFlight, RequestKey};
pub use crate::error::MarketError;
pub use crate::marketstack::{MarketData, Marketstack, Sort, SNAPSHOT_LIMIT};

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::dedupe::Deduplicated;
    pub use crate::error::MarketError;
    pub use crate::marketstack::{MarketData, Marketstack, SNAPSHOT_LIMIT};
    pub use reqwest::Client;

    pub fn build_client(config: &Config) -> reqwest::Result<Client> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(&config.user_agent)
            .build()?;
        Ok(client)
    }
}
