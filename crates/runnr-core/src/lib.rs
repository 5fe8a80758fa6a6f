//! Market snapshot aggregation and derived metrics.
//!
//! Everything in here is pure: no I/O, no shared state. Raw end-of-day bars go
//! in, per-symbol summaries, price changes and chart coordinates come out.
//! ```rust
//! use runnr_core::{aggregate, DailyBar};
//!
//! let raw: Vec<DailyBar> = vec![];
//! let rows = aggregate(&raw, &["AAPL", "MSFT"]);
//! assert_eq!(rows.len(), 2);
//! ```
pub mod aggregate;
pub mod bar;
pub mod chart;
pub mod de;
pub mod interval;
pub mod metrics;
pub mod universe;

pub use crate::aggregate::{aggregate, group_by_symbol, SymbolSummary};
pub use crate::bar::DailyBar;
pub use crate::chart::{normalize, Point};
pub use crate::interval::Interval;
pub use crate::metrics::{derive_change, range, Change, SessionStats, Trend};
pub use crate::universe::{Watchlist, DEFAULT_WATCHLIST, SCAN_UNIVERSE};
