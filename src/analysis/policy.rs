//! Work-hours and holiday classification policy

use crate::analysis::error::{AnalysisError, AnalysisResult};
use chrono::{DateTime, Datelike, Local, NaiveDate, Timelike, Weekday};
use std::collections::BTreeSet;

/// Date format used for holidays and reporting periods
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Work-hours window and holiday calendar.
///
/// Immutable after construction. An incident counts as in work hours when
/// its trigger hour falls inside `[start_hour, end_hour]` on a weekday that
/// is not a configured holiday. The end hour is inclusive: an incident
/// triggered anywhere within the `end_hour` clock hour is still in work
/// hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkHoursPolicy {
    /// First in-work clock hour (24h local time)
    start_hour: u32,

    /// Last in-work clock hour (24h local time, inclusive)
    end_hour: u32,

    /// Calendar dates excluded from work hours
    holidays: BTreeSet<NaiveDate>,
}

impl WorkHoursPolicy {
    /// Create a policy from a comma-delimited holiday list.
    ///
    /// Holidays are given as `DD.MM.YYYY` dates, e.g.
    /// `"25.12.2023,26.12.2023"`. A blank string means no holidays; any
    /// malformed entry fails construction.
    pub fn new(start_hour: u32, end_hour: u32, holidays: &str) -> AnalysisResult<Self> {
        Ok(Self {
            start_hour,
            end_hour,
            holidays: parse_holidays(holidays)?,
        })
    }

    /// First in-work clock hour
    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    /// Last in-work clock hour (inclusive)
    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Classify a trigger instant against this policy.
    ///
    /// Evaluated on local civil time: outside the hour window, on a
    /// Saturday or Sunday, or on a holiday date means not in work hours.
    pub fn is_in_work_hours(&self, triggered_at: &DateTime<Local>) -> bool {
        let date = triggered_at.date_naive();
        let hour = triggered_at.hour();

        if hour < self.start_hour
            || hour > self.end_hour
            || matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            || self.holidays.contains(&date)
        {
            return false;
        }

        true
    }
}

fn parse_holidays(holidays: &str) -> AnalysisResult<BTreeSet<NaiveDate>> {
    if holidays.trim().is_empty() {
        return Ok(BTreeSet::new());
    }

    holidays
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            NaiveDate::parse_from_str(entry, DATE_FORMAT)
                .map_err(|_| AnalysisError::HolidayParse(entry.to_string()))
        })
        .collect()
}
