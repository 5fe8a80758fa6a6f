use clap::{Parser, Subcommand, ValueEnum};
use runnr_core::Interval;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of logging
    #[arg(long, global = true, default_value = "info", ignore_case = true)]
    pub trace: TraceLevel,

    /// Print panels as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Latest close and daily change of each watchlist symbol.
    Watchlist {
        /// Symbols to track; the default watchlist when omitted.
        symbols: Vec<String>,
    },

    /// Momentum radar over the fixed scanner universe.
    Scanner {
        /// Write the table as CSV to stdout.
        #[arg(long)]
        csv: bool,
    },

    /// Closing-price chart of one ticker.
    Chart {
        ticker: String,

        /// Lookback: 1M, 3M, 6M or 1Y.
        #[arg(short, long, default_value = "1M")]
        interval: Interval,

        /// Also write the chart as an SVG file.
        #[arg(long)]
        svg: Option<String>,
    },

    /// Quick stats and ticker intel for the latest session of one ticker.
    Stats {
        ticker: String,

        /// Lookback: 1M, 3M, 6M or 1Y.
        #[arg(short, long, default_value = "1M")]
        interval: Interval,
    },

    /// Interactive dashboard; reads commands from stdin.
    Dashboard {
        /// Ticker shown first.
        #[arg(short, long, default_value = "AAPL")]
        ticker: String,

        /// Lookback: 1M, 3M, 6M or 1Y.
        #[arg(short, long, default_value = "1M")]
        interval: Interval,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<TraceLevel> for log::LevelFilter {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::TRACE => log::LevelFilter::Trace,
            TraceLevel::DEBUG => log::LevelFilter::Debug,
            TraceLevel::INFO => log::LevelFilter::Info,
            TraceLevel::WARN => log::LevelFilter::Warn,
            TraceLevel::ERROR => log::LevelFilter::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_interval_parses() {
        let cli = Cli::parse_from(["runnr", "chart", "nvda", "--interval", "6M"]);
        match cli.command {
            Commands::Chart { ticker, interval, svg } => {
                assert_eq!(ticker, "nvda");
                assert_eq!(interval, Interval::SixMonths);
                assert!(svg.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bad_interval_is_rejected() {
        assert!(Cli::try_parse_from(["runnr", "stats", "AAPL", "-i", "2W"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["runnr", "scanner", "--json", "--trace", "DEBUG"]);
        assert!(cli.json);
        assert_eq!(cli.trace, TraceLevel::DEBUG);
        assert!(matches!(cli.command, Commands::Scanner { csv: false }));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
