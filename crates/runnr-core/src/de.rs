use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Marketstack leaves gaps in its EOD rows as `null`, e.g.,
///
/// ```json
/// { "symbol": "SHOP", "open": null, "close": 71.2 }
/// ```
///
/// `de_price` reads those gaps as `0.0`.
pub fn de_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Volumes come back as integers most of the time, but some exchanges report them
/// as floats (`57429453.0`), and missing sessions report `null`.
///
/// `de_volume` handles all three, truncating fractional volumes.
pub fn de_volume<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(0),

        serde_json::Value::Number(num) => {
            if let Some(int) = num.as_u64() {
                Ok(int)
            } else if let Some(float) = num.as_f64() {
                // negative or NaN volumes are nonsense; clamp them to zero
                Ok(if float.is_finite() && float > 0.0 {
                    float.trunc() as u64
                } else {
                    0
                })
            } else {
                Err(serde::de::Error::custom("unable to read volume as a number"))
            }
        }

        _ => Err(serde::de::Error::custom("invalid type for volume")),
    }
}

/// Transform a Marketstack date string to a UTC timestamp, e.g.,
///             `2024-01-02T00:00:00+0000`  -> `2024-01-02 00:00:00 UTC`
///
/// RFC 3339 strings and bare `YYYY-MM-DD` dates (read as midnight UTC) are also
/// accepted; anything else is `None`.
pub fn parse_timestamp(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
