use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*};
use dotenv::dotenv;
use log::{error, trace, LevelFilter};
use runnr_client::prelude::*;
use std::sync::Arc;

mod cli;
mod commands;
mod dashboard;
mod panel;
mod render;
mod ui;

/// Load `.env`, then start logging at `level` unless `RUST_LOG` says otherwise.
fn preprocess(level: LevelFilter) {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    preprocess(cli.trace.into());
    trace!("Command line input recorded: {cli:#?}");

    let config = Config::from_env().map_err(|e| {
        error!("Configuration failed: {e}");
        e
    })?;
    let http = build_client(&config)?;
    let data = Arc::new(Deduplicated::new(Marketstack::new(http, config)));

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    // cli framework:
    // "> runnr <COMMAND>"
    match &cli.command {
        // "> runnr watchlist [SYMBOLS]"
        Watchlist { symbols } => commands::watchlist(data.as_ref(), symbols, cli.json).await?,

        // "> runnr scanner [--csv]"
        Scanner { csv } => commands::scanner(data.as_ref(), *csv, cli.json).await?,

        // "> runnr chart TICKER [-i INTERVAL] [--svg PATH]"
        Chart {
            ticker,
            interval,
            svg,
        } => {
            commands::chart(data.as_ref(), ticker, *interval, svg.as_deref(), cli.json).await?
        }

        // "> runnr stats TICKER [-i INTERVAL]"
        Stats { ticker, interval } => {
            commands::stats(data.as_ref(), ticker, *interval, cli.json).await?
        }

        // "> runnr dashboard [-t TICKER] [-i INTERVAL]"
        Dashboard { ticker, interval } => dashboard::run(data, ticker, *interval).await?,
    }

    Ok(())
}
