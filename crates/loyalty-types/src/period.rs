use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RewardError};

/// Earliest accepted reporting year.
pub const MIN_YEAR: i32 = 1000;
/// Latest accepted reporting year.
pub const MAX_YEAR: i32 = 5000;

/// A `(year, quarter)` pair. The quarter is always within `1..=4`.
///
/// [`ReportingPeriod::new`] also bounds the year to `MIN_YEAR..=MAX_YEAR`;
/// [`ReportingPeriod::span_years`] follows stored contract dates and does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReportingPeriod {
    year: i32,
    quarter: u32,
}

impl ReportingPeriod {
    pub fn new(year: i32, quarter: u32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(RewardError::InvalidYear(year));
        }
        if !(1..=4).contains(&quarter) {
            return Err(RewardError::InvalidQuarter(quarter));
        }
        Ok(Self { year, quarter })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u32 {
        self.quarter
    }

    /// First month of the quarter (1, 4, 7 or 10).
    pub fn first_month(&self) -> u32 {
        3 * self.quarter - 2
    }

    /// Last month of the quarter (3, 6, 9 or 12).
    pub fn last_month(&self) -> u32 {
        3 * self.quarter
    }

    /// Last calendar day of the quarter.
    pub fn last_day(&self) -> Result<NaiveDate> {
        let (next_year, next_month) = if self.last_month() == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.last_month() + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .ok_or(RewardError::InvalidYear(self.year))
    }

    /// Every quarter of every year in `first..=last`, in chronological order.
    ///
    /// Years come from stored contracts, so they are not held to the input
    /// bounds of [`ReportingPeriod::new`].
    pub fn span_years(first: i32, last: i32) -> Vec<ReportingPeriod> {
        (first..=last)
            .flat_map(|year| (1..=4).map(move |quarter| ReportingPeriod { year, quarter }))
            .collect()
    }
}

impl std::fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

/// Calendar quarter (1..=4) a date falls in, regardless of year.
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Reward earned by a partner in one reporting period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterReward {
    pub year: i32,
    pub quarter: u32,
    pub reward: i64,
}

impl QuarterReward {
    pub fn new(period: ReportingPeriod, reward: i64) -> Self {
        Self {
            year: period.year(),
            quarter: period.quarter(),
            reward,
        }
    }
}
