use serde::Serialize;

/// Symbols tracked in the sidebar until the user edits the list.
pub const DEFAULT_WATCHLIST: [&str; 7] = ["AAPL", "MSFT", "NVDA", "TSLA", "AMZN", "META", "AMD"];

/// Fixed symbol set of the momentum scanner, independent of the watchlist.
pub const SCAN_UNIVERSE: [&str; 15] = [
    "AAPL", "MSFT", "NVDA", "TSLA", "AMZN", "META", "AMD", "NFLX", "GOOGL", "AVGO", "ORCL", "CRM",
    "INTC", "SHOP", "UBER",
];

/// User-curated, ordered list of symbols; newest additions first.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Watchlist(Vec<String>);

impl Default for Watchlist {
    fn default() -> Self {
        Self(DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect())
    }
}

impl Watchlist {
    pub fn new<S: AsRef<str>>(symbols: &[S]) -> Self {
        let mut list = Self(Vec::with_capacity(symbols.len()));
        for symbol in symbols {
            let symbol = symbol.as_ref().trim().to_uppercase();
            if !symbol.is_empty() && !list.contains(&symbol) {
                list.0.push(symbol);
            }
        }
        list
    }

    /// Add `input` (trimmed, upper-cased) to the front of the list.
    ///
    /// Blank input and symbols already on the list are ignored. Returns `true` if
    /// the list changed, i.e. its snapshot needs fetching again.
    pub fn add(&mut self, input: &str) -> bool {
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() || self.contains(&symbol) {
            return false;
        }
        self.0.insert(0, symbol);
        true
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.iter().any(|s| s == symbol)
    }

    pub fn symbols(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
