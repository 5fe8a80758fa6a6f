use crate::config::Config;
use crate::error::MarketError;
use log::{debug, error, trace};
use reqwest::{Client, Url};
use runnr_core::DailyBar;
use serde::Deserialize;
use std::fmt;
use std::future::Future;

/// Default number of rows requested for a multi-symbol snapshot.
pub const SNAPSHOT_LIMIT: u32 = 120;

/// Source of end-of-day bars; the seam every panel fetches through.
pub trait MarketData: Send + Sync {
    /// One symbol, oldest first, at most `limit` of the most recent sessions.
    fn fetch_series(
        &self,
        symbol: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<DailyBar>, MarketError>> + Send;

    /// Several symbols in one request, newest first, `limit` rows in total.
    fn fetch_snapshot(
        &self,
        symbols: &[String],
        limit: u32,
    ) -> impl Future<Output = Result<Vec<DailyBar>, MarketError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
    Asc,
    Desc,
}

impl Sort {
    pub fn as_str(self) -> &'static str {
        match self {
            Sort::Asc => "ASC",
            Sort::Desc => "DESC",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marketstack `/eod` endpoint over a [`reqwest::Client`].
///
/// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
#[derive(Debug, Clone)]
pub struct Marketstack {
    http: Client,
    config: Config,
}

impl Marketstack {
    pub fn new(http: Client, config: Config) -> Self {
        Self { http, config }
    }

    /// `{base}/eod?access_key=..&symbols=..&limit=..&sort=..`
    pub fn eod_url(&self, symbols: &str, limit: u32, sort: Sort) -> Result<Url, MarketError> {
        let endpoint = format!("{}/eod", self.config.base_url.trim_end_matches('/'));
        let limit = limit.to_string();
        Url::parse_with_params(
            &endpoint,
            &[
                ("access_key", self.config.access_key.as_str()),
                ("symbols", symbols),
                ("limit", limit.as_str()),
                ("sort", sort.as_str()),
            ],
        )
        .map_err(|e| {
            error!("invalid Marketstack endpoint {endpoint}: {e}");
            MarketError::unavailable(e)
        })
    }

    /// GET `/eod` and decode the rows.
    ///
    /// Any non-2xx status, transport error or undecodable body is
    /// [`MarketError::DataUnavailable`]. The URL carries the access key, so it is
    /// never logged.
    pub async fn eod(
        &self,
        symbols: &str,
        limit: u32,
        sort: Sort,
    ) -> Result<Vec<DailyBar>, MarketError> {
        let time = std::time::Instant::now();
        let url = self.eod_url(symbols, limit, sort)?;

        trace!("GET /eod [{symbols}] limit={limit} sort={sort}");
        let response = self.http.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            error!("[{symbols}] market data request failed: {e}");
            e
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            let e = e.without_url();
            error!("[{symbols}] failed reading response body: {e}");
            e
        })?;

        if !status.is_success() {
            let reason = match serde_json::from_slice::<ApiErrorBody>(&body) {
                Ok(body) => format!("{status}: {} ({})", body.error.message, body.error.code),
                Err(_) => status.to_string(),
            };
            error!("[{symbols}] Marketstack responded {reason}");
            return Err(MarketError::DataUnavailable(reason));
        }

        let payload = serde_json::from_slice::<EodResponse>(&body).map_err(|e| {
            error!("[{symbols}] deserialization error: {e}");
            e
        })?;

        if let Some(page) = &payload.pagination {
            trace!(
                "[{symbols}] page {}..{} of {} rows",
                page.offset,
                page.end(),
                page.total
            );
        }

        let bars = payload.into_bars();
        debug!(
            "[{symbols}] {} bars fetched. Elapsed time: {} ms",
            bars.len(),
            time.elapsed().as_millis()
        );
        Ok(bars)
    }
}

impl MarketData for Marketstack {
    async fn fetch_series(&self, symbol: &str, limit: u32) -> Result<Vec<DailyBar>, MarketError> {
        self.eod(symbol, limit, Sort::Asc).await
    }

    async fn fetch_snapshot(
        &self,
        symbols: &[String],
        limit: u32,
    ) -> Result<Vec<DailyBar>, MarketError> {
        self.eod(&symbols.join(","), limit, Sort::Desc).await
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// `/eod` response body; a missing or `null` `data` is an empty page.
#[derive(Deserialize, Debug, Default)]
pub struct EodResponse {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub data: Option<Vec<DailyBar>>,
}

impl EodResponse {
    pub fn into_bars(self) -> Vec<DailyBar> {
        self.data.unwrap_or_default()
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct Pagination {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total: u64,
}

impl Pagination {
    /// Offset one past the last row of this page.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.count)
    }
}

/// Error body Marketstack sends alongside 4xx/5xx statuses.
#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}
