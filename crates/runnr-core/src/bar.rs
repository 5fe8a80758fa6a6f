use crate::de::{de_price, de_volume, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One end-of-day bar for one symbol.
/// ```json
/// {
///     "symbol": "AAPL",
///     "date": "2024-01-03T00:00:00+0000",
///     "open": 184.22,
///     "high": 185.88,
///     "low": 183.43,
///     "close": 184.25,
///     "volume": 58414460
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub symbol: String,
    pub date: String,
    #[serde(deserialize_with = "de_price")]
    pub open: f64,
    #[serde(deserialize_with = "de_price")]
    pub high: f64,
    #[serde(deserialize_with = "de_price")]
    pub low: f64,
    #[serde(deserialize_with = "de_price")]
    pub close: f64,
    #[serde(deserialize_with = "de_volume")]
    pub volume: u64,
}

impl DailyBar {
    /// The bar's `date`, parsed; `None` if the feed sent something unreadable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }

    /// The calendar day part of `date`, e.g. `2024-01-03`.
    pub fn day(&self) -> &str {
        self.date.split('T').next().unwrap_or(&self.date)
    }

    /// Intraday range, `high - low`.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_marketstack_row() {
        let json = r#"{
            "symbol": "AAPL",
            "date": "2024-01-03T00:00:00+0000",
            "open": 184.22,
            "high": 185.88,
            "low": 183.43,
            "close": 184.25,
            "volume": 58414460.0,
            "exchange": "XNAS"
        }"#;
        let bar: DailyBar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.symbol, "AAPL");
        assert_eq!(bar.volume, 58_414_460);
        assert_eq!(bar.day(), "2024-01-03");
        assert!(bar.timestamp().is_some());
        assert!((bar.range() - 2.45).abs() < 1e-9);
    }

    #[test]
    fn day_of_plain_date_is_itself() {
        let bar = DailyBar {
            symbol: "MSFT".into(),
            date: "2024-01-02".into(),
            open: 0.0,
            high: 0.0,
            low: 0.0,
            close: 0.0,
            volume: 0,
        };
        assert_eq!(bar.day(), "2024-01-02");
    }
}
