use chrono::NaiveDate;
use loyalty_types::{Contract, ReportingPeriod, Result, RewardError};
use serde::Serialize;

/// Date window in which a contract counts as active for a reporting period.
///
/// Both bounds are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveWindow {
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
}

impl ActiveWindow {
    /// Window for `period`: from the first day of the quarter's first month,
    /// `expiry_years` before the period's year, to the last day of the quarter.
    pub fn for_period(period: ReportingPeriod, expiry_years: u32) -> Result<Self> {
        let from_year = i32::try_from(expiry_years)
            .ok()
            .and_then(|years| period.year().checked_sub(years))
            .ok_or(RewardError::InvalidYear(period.year()))?;
        let valid_from = NaiveDate::from_ymd_opt(from_year, period.first_month(), 1)
            .ok_or(RewardError::InvalidYear(from_year))?;
        let valid_to = period.last_day()?;
        Ok(Self {
            valid_from,
            valid_to,
        })
    }

    /// Started strictly inside the window and still open after it.
    pub fn contains(&self, contract: &Contract) -> bool {
        contract.start_date > self.valid_from
            && contract.start_date < self.valid_to
            && contract.end_date.map_or(true, |end| end > self.valid_to)
    }
}
