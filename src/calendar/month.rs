use super::key::DateKey;
use std::fmt;
use thiserror::Error;
use time::{
    Date,
    Month::{self, *},
    Weekday,
};

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }
}

/// Number of days in the given month of the given year
pub(crate) fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        February if time::util::is_leap_year(year) => 29,
        February => 28,
        April | June | September | November => 30,
        January | March | May | July | August | October | December => 31,
    }
}

/// Years whose date keys still fit the four-digit `YYYY-MM-DD` form
const YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// The (year, month) pair currently on display.  Backed by the first day of
/// the month, so every cursor names a month the date library can represent.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct MonthCursor(Date);

impl MonthCursor {
    pub(crate) fn new(year: i32, month: Month) -> Result<MonthCursor, OutOfTimeError> {
        if !YEARS.contains(&year) {
            return Err(OutOfTimeError);
        }
        Date::from_calendar_date(year, month, 1)
            .map(MonthCursor)
            .map_err(|_| OutOfTimeError)
    }

    pub(crate) fn containing(date: Date) -> MonthCursor {
        MonthCursor(date.replace_day(1).unwrap_or(date))
    }

    pub(crate) fn year(self) -> i32 {
        self.0.year()
    }

    pub(crate) fn month(self) -> Month {
        self.0.month()
    }

    pub(crate) fn days_in_month(self) -> u8 {
        days_in_month(self.year(), self.month())
    }

    /// Column (0 = Sunday) on which day 1 of the month falls
    pub(crate) fn first_weekday_offset(self) -> u8 {
        self.0.weekday().index0()
    }

    pub(crate) fn next(self) -> Result<MonthCursor, OutOfTimeError> {
        let year = if self.month() == December {
            self.year().checked_add(1).ok_or(OutOfTimeError)?
        } else {
            self.year()
        };
        MonthCursor::new(year, self.month().next())
    }

    pub(crate) fn previous(self) -> Result<MonthCursor, OutOfTimeError> {
        let year = if self.month() == January {
            self.year().checked_sub(1).ok_or(OutOfTimeError)?
        } else {
            self.year()
        };
        MonthCursor::new(year, self.month().previous())
    }

    /// Returns `None` if `day` is not a day of this month
    pub(crate) fn date_key(self, day: u8) -> Option<DateKey> {
        DateKey::new(self.year(), self.month(), day).ok()
    }

    pub(crate) fn first_key(self) -> DateKey {
        DateKey::from(self.0)
    }

    pub(crate) fn last_key(self) -> DateKey {
        DateKey::from(self.0.replace_day(self.days_in_month()).unwrap_or(self.0))
    }

    pub(crate) fn contains(self, key: DateKey) -> bool {
        key.year() == self.year() && key.month() == self.month()
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
