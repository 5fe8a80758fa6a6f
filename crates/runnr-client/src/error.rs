use thiserror::Error;

/// The one way a market data request fails.
///
/// Callers show a fixed message for it; the reason only goes to the log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("market data unavailable: {0}")]
    DataUnavailable(String),
}

impl MarketError {
    pub fn unavailable(reason: impl ToString) -> Self {
        MarketError::DataUnavailable(reason.to_string())
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        MarketError::unavailable(err.without_url())
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::unavailable(err)
    }
}
