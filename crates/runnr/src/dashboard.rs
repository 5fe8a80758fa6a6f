use crate::panel::{Panel, PanelState, Ticket, CHART_FAILURE, SCANNER_FAILURE, WATCHLIST_FAILURE};
use crate::{render, ui};
use log::{debug, trace};
use runnr_client::{MarketData, MarketError, SNAPSHOT_LIMIT};
use runnr_core::{aggregate, DailyBar, Interval, SessionStats, Watchlist, SCAN_UNIVERSE};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

pub const HELP: &str = "\
commands:
  t <SYMBOL>     show SYMBOL in the chart
  i <1M|3M|6M|1Y> change the chart interval
  a <SYMBOL>     add SYMBOL to the watchlist
  r              refresh every panel
  h              this help
  q              quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Chart,
    Watchlist,
    Scanner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Series { symbol: String, limit: u32 },
    Snapshot { symbols: Vec<String>, limit: u32 },
}

/// A fetch a panel has asked for, tagged with the ticket its result must show.
#[derive(Debug)]
pub struct Request {
    pub kind: PanelKind,
    pub ticket: Ticket,
    pub query: Query,
}

#[derive(Debug)]
pub struct Update {
    pub kind: PanelKind,
    pub ticket: Ticket,
    pub result: Result<Vec<DailyBar>, MarketError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ticker(String),
    Interval(Interval),
    Add(String),
    Refresh,
    Help,
    Quit,
}

/// Read one line of dashboard input; blank lines are `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();

    let command = match (verb.to_lowercase().as_str(), arg) {
        ("t" | "ticker", Some(symbol)) => Command::Ticker(symbol.to_uppercase()),
        ("i" | "interval", Some(interval)) => Command::Interval(Interval::resolve(interval)),
        ("a" | "add", Some(symbol)) => Command::Add(symbol.to_string()),
        ("r" | "refresh", _) => Command::Refresh,
        ("h" | "help" | "?", _) => Command::Help,
        ("q" | "quit" | "exit", _) => Command::Quit,
        ("t" | "ticker" | "i" | "interval" | "a" | "add", None) => {
            return Err(format!("`{verb}` needs an argument"))
        }
        _ => return Err(format!("unknown command `{verb}`; type h for help")),
    };
    Ok(Some(command))
}

/// Selection state plus the three independently-fetching panels.
pub struct Dashboard {
    ticker: String,
    interval: Interval,
    watchlist: Watchlist,
    chart: Panel<Vec<DailyBar>>,
    sidebar: Panel<Vec<DailyBar>>,
    scanner: Panel<Vec<DailyBar>>,
}

impl Dashboard {
    pub fn new(ticker: &str, interval: Interval) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            interval,
            watchlist: Watchlist::default(),
            chart: Panel::new("chart", CHART_FAILURE),
            sidebar: Panel::new("watchlist", WATCHLIST_FAILURE),
            scanner: Panel::new("scanner", SCANNER_FAILURE),
        }
    }

    fn panel(&self, kind: PanelKind) -> &Panel<Vec<DailyBar>> {
        match kind {
            PanelKind::Chart => &self.chart,
            PanelKind::Watchlist => &self.sidebar,
            PanelKind::Scanner => &self.scanner,
        }
    }

    fn panel_mut(&mut self, kind: PanelKind) -> &mut Panel<Vec<DailyBar>> {
        match kind {
            PanelKind::Chart => &mut self.chart,
            PanelKind::Watchlist => &mut self.sidebar,
            PanelKind::Scanner => &mut self.scanner,
        }
    }

    pub fn state(&self, kind: PanelKind) -> &PanelState<Vec<DailyBar>> {
        self.panel(kind).state()
    }

    pub fn is_loading(&self) -> bool {
        [PanelKind::Chart, PanelKind::Watchlist, PanelKind::Scanner]
            .into_iter()
            .any(|kind| self.panel(kind).is_loading())
    }

    /// Fetches for first display: every panel, except an empty watchlist.
    pub fn mount(&mut self) -> Vec<Request> {
        let mut requests = vec![self.request(PanelKind::Chart)];
        if !self.watchlist.is_empty() {
            requests.push(self.request(PanelKind::Watchlist));
        }
        requests.push(self.request(PanelKind::Scanner));
        requests
    }

    /// Apply a user command; returns the fetches it makes due.
    pub fn handle(&mut self, command: Command) -> Vec<Request> {
        match command {
            Command::Ticker(symbol) if !symbol.is_empty() && symbol != self.ticker => {
                self.ticker = symbol;
                vec![self.request(PanelKind::Chart)]
            }
            Command::Interval(interval) if interval != self.interval => {
                self.interval = interval;
                vec![self.request(PanelKind::Chart)]
            }
            Command::Add(symbol) if self.watchlist.add(&symbol) => {
                vec![self.request(PanelKind::Watchlist)]
            }
            Command::Refresh => self.mount(),
            _ => vec![],
        }
    }

    fn request(&mut self, kind: PanelKind) -> Request {
        let query = match kind {
            PanelKind::Chart => Query::Series {
                symbol: self.ticker.clone(),
                limit: self.interval.limit(),
            },
            PanelKind::Watchlist => Query::Snapshot {
                symbols: self.watchlist.symbols().to_vec(),
                limit: SNAPSHOT_LIMIT,
            },
            PanelKind::Scanner => Query::Snapshot {
                symbols: SCAN_UNIVERSE.iter().map(|s| s.to_string()).collect(),
                limit: SNAPSHOT_LIMIT,
            },
        };
        let ticket = self.panel_mut(kind).begin();
        trace!("{kind:?} panel issuing {query:?} with {ticket:?}");
        Request {
            kind,
            ticket,
            query,
        }
    }

    /// Hand a finished fetch to its panel; `false` if it was stale.
    pub fn settle(&mut self, update: Update) -> bool {
        self.panel_mut(update.kind).settle(update.ticket, update.result)
    }

    pub fn close(&mut self) {
        self.chart.close();
        self.sidebar.close();
        self.scanner.close();
    }

    pub fn render(&self, kind: PanelKind) -> String {
        let panel = self.panel(kind);
        let data = match panel.state() {
            PanelState::Idle => return String::new(),
            PanelState::Loading => {
                return ui::muted(&format!("Loading {}...", panel.name())).to_string()
            }
            PanelState::Failed(message) => return ui::error(message).to_string(),
            PanelState::Ready(data) => data,
        };

        match kind {
            PanelKind::Chart => {
                let stats = SessionStats::from_series(data);
                [
                    render::chart(&self.ticker, self.interval, data),
                    render::quick_stats(stats.as_ref()),
                    render::intel(&self.ticker, stats.as_ref()),
                ]
                .join("\n\n")
            }
            PanelKind::Watchlist => {
                let rows = aggregate(data, self.watchlist.symbols());
                render::watchlist(&rows, Some(&self.ticker))
            }
            PanelKind::Scanner => render::scanner(&aggregate(data, &SCAN_UNIVERSE)),
        }
    }
}

/// Run `request` on its own task and post the result back, whatever it is.
pub fn dispatch<M>(data: &Arc<M>, request: Request, tx: &UnboundedSender<Update>)
where
    M: MarketData + 'static,
{
    let data = Arc::clone(data);
    let tx = tx.clone();
    tokio::spawn(async move {
        let Request {
            kind,
            ticket,
            query,
        } = request;
        let result = match &query {
            Query::Series { symbol, limit } => data.fetch_series(symbol, *limit).await,
            Query::Snapshot { symbols, limit } => data.fetch_snapshot(symbols, *limit).await,
        };
        if tx
            .send(Update {
                kind,
                ticket,
                result,
            })
            .is_err()
        {
            debug!("{kind:?} response arrived after the dashboard closed");
        }
    });
}

/// Interactive loop: commands from stdin, panel updates as they land.
///
/// Ends on `q`, or at end of input once nothing is loading any more.
pub async fn run<M>(data: Arc<M>, ticker: &str, interval: Interval) -> anyhow::Result<()>
where
    M: MarketData + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Update>();
    let mut dashboard = Dashboard::new(ticker, interval);

    println!("{HELP}\n");
    for request in dashboard.mount() {
        dispatch(&data, request, &tx);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    if !dashboard.is_loading() {
                        break;
                    }
                    continue;
                };

                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => println!("{HELP}"),
                    Ok(Some(command)) => {
                        for request in dashboard.handle(command) {
                            let kind = request.kind;
                            dispatch(&data, request, &tx);
                            println!("{}", dashboard.render(kind));
                        }
                    }
                    Err(msg) => println!("{}", ui::error(&msg)),
                }
            }

            Some(update) = rx.recv() => {
                let kind = update.kind;
                if dashboard.settle(update) {
                    println!("\n{}\n", dashboard.render(kind));
                }
                if !stdin_open && !dashboard.is_loading() {
                    break;
                }
            }
        }
    }

    dashboard.close();
    Ok(())
}
