use crate::panel::{CHART_FAILURE, SCANNER_FAILURE, WATCHLIST_FAILURE};
use crate::{render, ui};
use anyhow::Result;
use log::{debug, error, info};
use runnr_client::{MarketData, MarketError, SNAPSHOT_LIMIT};
use runnr_core::chart::{self, normalize};
use runnr_core::{aggregate, DailyBar, Interval, SessionStats, Watchlist, SCAN_UNIVERSE};
use serde::Serialize;

/// Run `fetch` behind a spinner; on failure log the cause and show `failure`.
async fn load<F>(msg: &str, failure: &'static str, fetch: F) -> Option<Vec<DailyBar>>
where
    F: std::future::Future<Output = Result<Vec<DailyBar>, MarketError>>,
{
    let pb = ui::spinner(msg);
    let result = fetch.await;
    pb.finish_and_clear();

    match result {
        Ok(bars) => {
            debug!("{msg} returned {} bars", bars.len());
            Some(bars)
        }
        Err(e) => {
            error!("{msg} failed: {e}");
            eprintln!("{}", ui::error(failure));
            None
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// -------------------------------------------------------------------------------------------------

/// "> runnr watchlist [SYMBOLS]"
pub async fn watchlist<M: MarketData>(data: &M, symbols: &[String], json: bool) -> Result<()> {
    let list = if symbols.is_empty() {
        Watchlist::default()
    } else {
        Watchlist::new(symbols)
    };
    if list.is_empty() {
        info!("Watchlist is empty; nothing to fetch");
        return Ok(());
    }

    let Some(raw) = load(
        "Loading watchlist",
        WATCHLIST_FAILURE,
        data.fetch_snapshot(list.symbols(), SNAPSHOT_LIMIT),
    )
    .await
    else {
        return Ok(());
    };

    let rows = aggregate(&raw, list.symbols());
    if json {
        print_json(&rows)
    } else {
        println!("{}", render::watchlist(&rows, None));
        Ok(())
    }
}

/// "> runnr scanner [--csv]"
pub async fn scanner<M: MarketData>(data: &M, csv: bool, json: bool) -> Result<()> {
    let universe: Vec<String> = SCAN_UNIVERSE.iter().map(|s| s.to_string()).collect();
    let Some(raw) = load(
        "Scanning",
        SCANNER_FAILURE,
        data.fetch_snapshot(&universe, SNAPSHOT_LIMIT),
    )
    .await
    else {
        return Ok(());
    };

    let rows = aggregate(&raw, &universe);
    if json {
        print_json(&rows)
    } else if csv {
        render::scanner_csv(&rows, std::io::stdout().lock())?;
        Ok(())
    } else {
        println!("{}", render::scanner(&rows));
        Ok(())
    }
}

async fn series<M: MarketData>(
    data: &M,
    ticker: &str,
    interval: Interval,
) -> Option<Vec<DailyBar>> {
    load(
        &format!("Loading {ticker} ({interval})"),
        CHART_FAILURE,
        data.fetch_series(ticker, interval.limit()),
    )
    .await
}

/// "> runnr chart TICKER [-i 1M|3M|6M|1Y] [--svg PATH]"
pub async fn chart<M: MarketData>(
    data: &M,
    ticker: &str,
    interval: Interval,
    svg: Option<&str>,
    json: bool,
) -> Result<()> {
    let ticker = ticker.trim().to_uppercase();
    let Some(series) = series(data, &ticker, interval).await else {
        return Ok(());
    };

    if let Some(path) = svg {
        let closes: Vec<f64> = series.iter().map(|bar| bar.close).collect();
        tokio::fs::write(path, chart::svg(normalize(&closes))).await?;
        info!("Chart written to {path}");
    }

    if json {
        print_json(&series)
    } else {
        println!("{}", render::chart(&ticker, interval, &series));
        Ok(())
    }
}

/// "> runnr stats TICKER [-i 1M|3M|6M|1Y]"
pub async fn stats<M: MarketData>(
    data: &M,
    ticker: &str,
    interval: Interval,
    json: bool,
) -> Result<()> {
    let ticker = ticker.trim().to_uppercase();
    let Some(series) = series(data, &ticker, interval).await else {
        return Ok(());
    };
    let stats = SessionStats::from_series(&series);

    if json {
        print_json(&stats)
    } else {
        println!("{}\n", render::quick_stats(stats.as_ref()));
        println!("{}", render::intel(&ticker, stats.as_ref()));
        Ok(())
    }
}
