use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use runnr_core::Trend;
use std::time::Duration;

/// Spinner shown while a panel's data is on its way.
pub fn spinner(msg: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Green for bullish, red for bearish.
pub fn trend(text: &str, trend: Trend) -> ColoredString {
    match trend {
        Trend::Bullish => text.green(),
        Trend::Bearish => text.red(),
    }
}

pub fn muted(text: &str) -> ColoredString {
    text.dimmed()
}

pub fn heading(text: &str) -> ColoredString {
    text.to_uppercase().bold()
}

pub fn error(text: &str) -> ColoredString {
    text.red()
}
