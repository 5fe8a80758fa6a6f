use crate::bar::DailyBar;
use serde::Serialize;
use std::fmt;

/// Anything carrying a closing price.
pub trait Close {
    fn close(&self) -> f64;
}

impl Close for f64 {
    fn close(&self) -> f64 {
        *self
    }
}

impl Close for DailyBar {
    fn close(&self) -> f64 {
        self.close
    }
}

impl<T: Close + ?Sized> Close for &T {
    fn close(&self) -> f64 {
        (**self).close()
    }
}

/// Signed move between two closes.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Change {
    pub change: f64,
    pub change_pct: f64,
}

/// `last - previous`, and the same as a percentage of `previous`.
///
/// A zero `previous` close gives a `change_pct` of `0`, never `inf` or `NaN`.
pub fn derive_change(last: impl Close, previous: impl Close) -> Change {
    let (last, previous) = (last.close(), previous.close());
    let change = last - previous;
    let change_pct = if previous != 0.0 {
        (change / previous) * 100.0
    } else {
        0.0
    };
    Change { change, change_pct }
}

/// Intraday range of the latest bar, `0` when there is none.
pub fn range(last: Option<&DailyBar>) -> f64 {
    last.map(DailyBar::range).unwrap_or(0.0)
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    /// A flat session (`change == 0`) counts as bullish.
    pub fn of(change: f64) -> Self {
        if change >= 0.0 {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    }

    pub fn is_bullish(self) -> bool {
        self == Trend::Bullish
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "Bullish"),
            Trend::Bearish => write!(f, "Bearish"),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeExpansion {
    Active,
    Muted,
}

impl RangeExpansion {
    pub fn of(range: f64) -> Self {
        if range > 0.0 {
            RangeExpansion::Active
        } else {
            RangeExpansion::Muted
        }
    }
}

impl fmt::Display for RangeExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeExpansion::Active => write!(f, "Active"),
            RangeExpansion::Muted => write!(f, "Muted"),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumePressure {
    Elevated,
    Normal,
}

impl VolumePressure {
    pub fn of(volume: u64) -> Self {
        if volume > 0 {
            VolumePressure::Elevated
        } else {
            VolumePressure::Normal
        }
    }
}

impl fmt::Display for VolumePressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumePressure::Elevated => write!(f, "Elevated"),
            VolumePressure::Normal => write!(f, "Normal"),
        }
    }
}

/// Stats of the most recent session of an ascending-date series; what the quick
/// stats cards and the ticker intel panel show.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub latest: DailyBar,
    pub previous: Option<DailyBar>,
    pub change: Change,
    pub range: f64,
    pub trend: Trend,
    pub range_expansion: RangeExpansion,
    pub volume_pressure: VolumePressure,
}

impl SessionStats {
    /// `None` for an empty series. Without a prior session the change is `0`.
    pub fn from_series(series: &[DailyBar]) -> Option<Self> {
        let (latest, head) = series.split_last()?;
        let previous = head.last();

        let change = derive_change(latest, previous.unwrap_or(latest));
        let range = range(Some(latest));

        Some(Self {
            latest: latest.clone(),
            previous: previous.cloned(),
            change,
            range,
            trend: Trend::of(change.change),
            range_expansion: RangeExpansion::of(range),
            volume_pressure: VolumePressure::of(latest.volume),
        })
    }
}
