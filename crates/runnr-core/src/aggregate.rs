use crate::bar::DailyBar;
use crate::metrics::{derive_change, Change, Trend};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Latest-session summary of one tracked symbol, as shown in the watchlist and
/// scanner tables.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SymbolSummary {
    pub symbol: String,
    pub last_close: f64,
    pub previous_close: f64,
    pub volume: u64,
    pub range: f64,
}

impl SymbolSummary {
    /// The record used for a symbol the snapshot had no bars for.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            last_close: 0.0,
            previous_close: 0.0,
            volume: 0,
            range: 0.0,
        }
    }

    pub fn change(&self) -> Change {
        derive_change(self.last_close, self.previous_close)
    }

    pub fn trend(&self) -> Trend {
        Trend::of(self.change().change)
    }
}

/// Partition `raw` by symbol, each group sorted most-recent-first.
///
/// The sort is stable, so bars sharing a date keep their arrival order. Bars with
/// unreadable dates sink to the end of their group.
pub fn group_by_symbol(raw: &[DailyBar]) -> HashMap<&str, Vec<&DailyBar>> {
    let mut groups: HashMap<&str, Vec<&DailyBar>> = HashMap::new();
    for bar in raw {
        groups.entry(bar.symbol.as_str()).or_default().push(bar);
    }

    for (symbol, group) in groups.iter_mut() {
        group.sort_by_cached_key(|bar| Reverse(bar.timestamp()));
        if group.last().is_some_and(|bar| bar.timestamp().is_none()) {
            log::warn!("[{symbol}] snapshot holds bars with unreadable dates");
        }
    }

    groups
}

/// Reduce a raw snapshot to one [`SymbolSummary`] per entry of `tracked`, in the
/// order given.
///
/// Symbols in `raw` that aren't tracked are dropped; tracked symbols missing from
/// `raw` come back zeroed. With a single bar, `previous_close == last_close`.
/// ```rust
/// use runnr_core::{aggregate, DailyBar};
///
/// let bar = |date: &str, close: f64| DailyBar {
///     symbol: "AAPL".into(),
///     date: date.into(),
///     open: close,
///     high: close,
///     low: close,
///     close,
///     volume: 1,
/// };
/// let rows = aggregate(&[bar("2024-01-02", 100.0), bar("2024-01-03", 110.0)], &["AAPL"]);
/// assert_eq!(rows[0].last_close, 110.0);
/// assert_eq!(rows[0].previous_close, 100.0);
/// ```
pub fn aggregate<S: AsRef<str>>(raw: &[DailyBar], tracked: &[S]) -> Vec<SymbolSummary> {
    let groups = group_by_symbol(raw);
    log::trace!(
        "aggregating {} raw bars over {} symbols for {} tracked symbols",
        raw.len(),
        groups.len(),
        tracked.len()
    );

    tracked
        .iter()
        .map(|symbol| {
            let symbol = symbol.as_ref();
            let bars = groups.get(symbol).map(Vec::as_slice).unwrap_or_default();
            match bars {
                [] => SymbolSummary::empty(symbol),
                [last, rest @ ..] => {
                    let previous = rest.first().unwrap_or(last);
                    SymbolSummary {
                        symbol: symbol.to_string(),
                        last_close: last.close,
                        previous_close: previous.close,
                        volume: last.volume,
                        range: last.range(),
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(symbol: &str, date: &str, close: f64) -> DailyBar {
        DailyBar {
            symbol: symbol.to_string(),
            date: date.to_string(),
            open: close,
            high: close + 2.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn output_matches_tracked_length_and_order() {
        let raw = vec![
            bar("MSFT", "2024-01-03", 370.0),
            bar("AAPL", "2024-01-03", 184.0),
            bar("NVDA", "2024-01-03", 475.0),
        ];
        let tracked = ["NVDA", "AAPL", "AMD", "MSFT"];
        let rows = aggregate(&raw, &tracked);

        let symbols: Vec<&str> = rows.iter().map(|row| row.symbol.as_str()).collect();
        assert_eq!(symbols, tracked);
    }

    #[test]
    fn empty_tracked_list_gives_empty_output() {
        let raw = vec![bar("AAPL", "2024-01-03", 184.0)];
        let tracked: [&str; 0] = [];
        assert!(aggregate(&raw, &tracked).is_empty());
    }

    #[test]
    fn duplicate_tracked_symbols_each_get_a_row() {
        let raw = vec![bar("AAPL", "2024-01-03", 184.0)];
        let rows = aggregate(&raw, &["AAPL", "AAPL"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], rows[1]);
    }

    #[test]
    fn missing_symbol_is_zeroed() {
        let rows = aggregate(&[], &["MSFT"]);
        assert_eq!(
            rows,
            vec![SymbolSummary {
                symbol: "MSFT".to_string(),
                last_close: 0.0,
                previous_close: 0.0,
                volume: 0,
                range: 0.0,
            }]
        );
        assert_eq!(rows[0].change().change_pct, 0.0);
    }

    #[test]
    fn single_bar_falls_back_to_last_close() {
        let rows = aggregate(&[bar("AMD", "2024-01-03", 140.0)], &["AMD"]);
        assert_eq!(rows[0].last_close, 140.0);
        assert_eq!(rows[0].previous_close, 140.0);
        assert_eq!(rows[0].change().change, 0.0);
        assert_eq!(rows[0].trend(), Trend::Bullish);
    }

    #[test]
    fn ascending_input_is_reordered() {
        let raw = vec![
            bar("AAPL", "2024-01-02", 100.0),
            bar("AAPL", "2024-01-03", 110.0),
        ];
        let row = &aggregate(&raw, &["AAPL"])[0];
        assert_eq!(row.last_close, 110.0);
        assert_eq!(row.previous_close, 100.0);
        assert_eq!(row.volume, 1_000);
        assert!((row.range - 3.0).abs() < 1e-9);

        let change = row.change();
        assert_eq!(change.change, 10.0);
        assert!((change.change_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn shuffled_input_picks_two_most_recent() {
        let raw = vec![
            bar("TSLA", "2024-01-02T00:00:00+0000", 248.0),
            bar("TSLA", "2024-01-05T00:00:00+0000", 237.0),
            bar("TSLA", "2023-12-29T00:00:00+0000", 250.0),
            bar("TSLA", "2024-01-04T00:00:00+0000", 237.5),
        ];
        let row = &aggregate(&raw, &["TSLA"])[0];
        assert_eq!(row.last_close, 237.0);
        assert_eq!(row.previous_close, 237.5);
        assert_eq!(row.trend(), Trend::Bearish);
    }

    #[test]
    fn untracked_symbols_are_discarded() {
        let raw = vec![
            bar("AAPL", "2024-01-03", 184.0),
            bar("TSLA", "2024-01-03", 238.0),
            bar("AAPL", "2024-01-02", 185.0),
        ];
        let rows = aggregate(&raw, &["TSLA"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "TSLA");
        assert_eq!(rows[0].last_close, 238.0);
        assert_eq!(rows[0].previous_close, 238.0);
    }

    #[test]
    fn identical_dates_are_deterministic() {
        let raw = vec![
            bar("META", "2024-01-03", 344.0),
            bar("META", "2024-01-03", 346.0),
            bar("META", "2024-01-02", 340.0),
        ];
        let first = aggregate(&raw, &["META"]);
        for _ in 0..16 {
            assert_eq!(aggregate(&raw, &["META"]), first);
        }
        // stable: arrival order survives among equal dates
        assert_eq!(first[0].last_close, 344.0);
        assert_eq!(first[0].previous_close, 346.0);
    }

    #[test]
    fn unreadable_dates_sort_last() {
        let raw = vec![
            bar("AMZN", "not a date", 1.0),
            bar("AMZN", "2024-01-02", 150.0),
        ];
        let groups = group_by_symbol(&raw);
        assert_eq!(groups["AMZN"][0].close, 150.0);
        assert_eq!(groups["AMZN"][1].close, 1.0);
    }

    #[test]
    fn owned_symbol_lists_are_accepted() {
        let tracked = vec!["AAPL".to_string()];
        let rows = aggregate(&[bar("AAPL", "2024-01-03", 184.0)], &tracked);
        assert_eq!(rows[0].last_close, 184.0);
    }
}
