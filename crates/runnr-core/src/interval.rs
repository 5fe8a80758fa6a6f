use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Chart lookback, counted in trading sessions.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Interval {
    pub const ALL: [Interval; 4] = [
        Interval::OneMonth,
        Interval::ThreeMonths,
        Interval::SixMonths,
        Interval::OneYear,
    ];

    /// Short button label, e.g. `3M`.
    pub fn label(self) -> &'static str {
        match self {
            Interval::OneMonth => "1M",
            Interval::ThreeMonths => "3M",
            Interval::SixMonths => "6M",
            Interval::OneYear => "1Y",
        }
    }

    /// Long form, e.g. `3month`.
    pub fn value(self) -> &'static str {
        match self {
            Interval::OneMonth => "1month",
            Interval::ThreeMonths => "3month",
            Interval::SixMonths => "6month",
            Interval::OneYear => "1year",
        }
    }

    /// Number of daily bars requested for the interval.
    pub fn limit(self) -> u32 {
        match self {
            Interval::OneMonth => 22,
            Interval::ThreeMonths => 66,
            Interval::SixMonths => 132,
            Interval::OneYear => 260,
        }
    }

    /// Lenient lookup: anything unrecognised is one month.
    pub fn resolve(input: &str) -> Self {
        input.parse().unwrap_or_default()
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Interval::ALL
            .into_iter()
            .find(|interval| {
                interval.label().eq_ignore_ascii_case(s) || interval.value().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| {
                format!("unknown interval `{s}`; expected one of 1M, 3M, 6M, 1Y")
            })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
