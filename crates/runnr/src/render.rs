//! Plain-text renderings of the dashboard panels.
use crate::ui;
use colored::Colorize;
use runnr_core::chart::{self, normalize};
use runnr_core::metrics::{RangeExpansion, VolumePressure};
use runnr_core::{Change, DailyBar, Interval, SessionStats, SymbolSummary, Trend};
use serde::Serialize;

const PLOT_WIDTH: usize = 64;
const PLOT_HEIGHT: usize = 14;

/// en-US grouping, at most two fraction digits: `1234.5` -> `1,234.5`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // rounding can leave "-0"; drop the sign then
    let sign = if value < 0.0 && (grouped != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

/// Percent move with an explicit `+` on flat or rising sessions, e.g. `+1.25%`.
pub fn format_change(change: &Change) -> String {
    let sign = if change.change >= 0.0 { "+" } else { "" };
    format!("{sign}{:.2}%", change.change_pct)
}

// -------------------------------------------------------------------------------------------------

pub fn watchlist(rows: &[SymbolSummary], current: Option<&str>) -> String {
    let mut lines = vec![ui::heading("Watchlist").to_string()];
    for row in rows {
        let change = row.change();
        let marker = if current == Some(row.symbol.as_str()) {
            ">"
        } else {
            " "
        };
        lines.push(format!(
            "{marker} {:<6} {:>10} {}",
            row.symbol.bold(),
            format_price(row.last_close),
            ui::trend(&format!("{:>9}", format_change(&change)), row.trend()),
        ));
    }
    lines.join("\n")
}

pub fn scanner(rows: &[SymbolSummary]) -> String {
    let mut lines = vec![
        ui::heading("Momentum Radar").to_string(),
        ui::muted(&format!(
            "{:<6} {:>12} {:>10} {:>10} {:>16}",
            "Symbol", "Last", "Change %", "Range", "Volume"
        ))
        .to_string(),
    ];
    for row in rows {
        let change = row.change();
        lines.push(format!(
            "{:<6} {:>12} {} {:>10} {:>16}",
            row.symbol.bold(),
            format_number(row.last_close),
            ui::trend(&format!("{:>10}", format_change(&change)), row.trend()),
            format_number(row.range),
            format_number(row.volume as f64),
        ));
    }
    lines.join("\n")
}

#[derive(Serialize, Debug)]
struct ScannerRecord<'a> {
    symbol: &'a str,
    last_close: f64,
    previous_close: f64,
    change: f64,
    change_pct: f64,
    range: f64,
    volume: u64,
}

/// The scanner table as CSV, one record per row.
pub fn scanner_csv<W: std::io::Write>(rows: &[SymbolSummary], writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        let change = row.change();
        wtr.serialize(ScannerRecord {
            symbol: &row.symbol,
            last_close: row.last_close,
            previous_close: row.previous_close,
            change: change.change,
            change_pct: change.change_pct,
            range: row.range,
            volume: row.volume,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

// -------------------------------------------------------------------------------------------------

pub fn chart(ticker: &str, interval: Interval, series: &[DailyBar]) -> String {
    let stats = SessionStats::from_series(series);
    let (price, change) = match &stats {
        Some(stats) => (format_price(stats.latest.close), stats.change),
        None => ("--".to_string(), Change::default()),
    };
    let trend = Trend::of(change.change);

    let intervals = Interval::ALL
        .iter()
        .map(|option| {
            if *option == interval {
                format!("[{option}]").green().bold().to_string()
            } else {
                format!(" {option} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut lines = vec![
        ui::heading("Live chart").to_string(),
        format!(
            "{}  {}  {}",
            ticker.bold(),
            price.bold(),
            ui::trend(&format!("{} today", format_change(&change)), trend)
        ),
        intervals,
    ];

    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        lines.push(ui::muted("No data available").to_string());
        return lines.join("\n");
    };

    let closes: Vec<f64> = series.iter().map(|bar| bar.close).collect();
    for row in chart::plot(normalize(&closes), PLOT_WIDTH, PLOT_HEIGHT) {
        lines.push(format!("  {}", ui::trend(&row, trend)));
    }
    lines.push(ui::muted(&format!(
        "  {:<width$}{}",
        first.day(),
        last.day(),
        width = PLOT_WIDTH.saturating_sub(last.day().len())
    ))
    .to_string());

    lines.join("\n")
}

pub fn quick_stats(stats: Option<&SessionStats>) -> String {
    let Some(stats) = stats else {
        return ui::muted("Select a ticker to view stats.").to_string();
    };

    let latest = &stats.latest;
    let cards = [
        ("Open", format_number(latest.open)),
        ("High", format_number(latest.high)),
        ("Low", format_number(latest.low)),
        ("Close", format_number(latest.close)),
        ("Volume", format_number(latest.volume as f64)),
        ("Daily Change", format_change(&stats.change)),
    ];

    cards
        .iter()
        .map(|(label, value)| format!("{:<14} {value}", ui::muted(&label.to_uppercase())))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn intel(ticker: &str, stats: Option<&SessionStats>) -> String {
    let change = stats.map(|s| s.change).unwrap_or_default();
    let trend = stats.map(|s| s.trend).unwrap_or(Trend::of(change.change));
    let range_expansion = stats
        .map(|s| s.range_expansion)
        .unwrap_or(RangeExpansion::Muted);
    let volume_pressure = stats
        .map(|s| s.volume_pressure)
        .unwrap_or(VolumePressure::Normal);
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "--".to_string());

    let lines = [
        ui::heading("Ticker intel").to_string(),
        ticker.bold().to_string(),
        ui::trend(&format!("{} from prior close", format_change(&change)), trend).to_string(),
        String::new(),
        ui::muted("Session overview").to_string(),
        format!(
            "  {:<18}{}",
            "Close",
            or_dash(stats.map(|s| format_number(s.latest.close)))
        ),
        format!(
            "  {:<18}{}",
            "Daily range",
            or_dash(stats.map(|s| format_number(s.range)))
        ),
        format!(
            "  {:<18}{}",
            "Volume",
            or_dash(stats.map(|s| format_number(s.latest.volume as f64)))
        ),
        String::new(),
        ui::muted("Momentum signals").to_string(),
        format!("  {:<18}{trend}", "Trend bias"),
        format!("  {:<18}{range_expansion}", "Range expansion"),
        format!("  {:<18}{volume_pressure}", "Volume pressure"),
    ];
    lines.join("\n")
}
