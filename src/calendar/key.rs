use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, Month};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// A calendar day in its canonical `YYYY-MM-DD` form, used both as the key of
/// the local note map and as the row key in the notes store
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct DateKey(Date);

impl DateKey {
    pub(crate) fn new(year: i32, month: Month, day: u8) -> Result<DateKey, InvalidDateKey> {
        Date::from_calendar_date(year, month, day)
            .map(DateKey)
            .map_err(|_| InvalidDateKey(format!("{year}-{:02}-{day:02}", u8::from(month))))
    }

    pub(crate) fn date(self) -> Date {
        self.0
    }

    pub(crate) fn year(self) -> i32 {
        self.0.year()
    }

    pub(crate) fn month(self) -> Month {
        self.0.month()
    }

    pub(crate) fn day(self) -> u8 {
        self.0.day()
    }
}

impl From<Date> for DateKey {
    fn from(date: Date) -> DateKey {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year(),
            u8::from(self.month()),
            self.day()
        )
    }
}

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(s: &str) -> Result<DateKey, InvalidDateKey> {
        Date::parse(s, &YMD_FMT)
            .map(DateKey)
            .map_err(|_| InvalidDateKey(s.to_owned()))
    }
}

impl TryFrom<String> for DateKey {
    type Error = InvalidDateKey;

    fn try_from(s: String) -> Result<DateKey, InvalidDateKey> {
        s.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> String {
        key.to_string()
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid date key {0:?}; expected YYYY-MM-DD")]
pub(crate) struct InvalidDateKey(String);

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_zero_padded() {
        let key = DateKey::new(2024, Month::March, 5).unwrap();
        assert_eq!(key.to_string(), "2024-03-05");
        let key = DateKey::new(987, Month::January, 1).unwrap();
        assert_eq!(key.to_string(), "0987-01-01");
        let key = DateKey::new(2024, Month::December, 31).unwrap();
        assert_eq!(key.to_string(), "2024-12-31");
    }

    #[test]
    fn test_invalid_day() {
        let e = DateKey::new(2023, Month::February, 29).unwrap_err();
        assert_eq!(
            e.to_string(),
            "invalid date key \"2023-02-29\"; expected YYYY-MM-DD"
        );
    }

    #[test]
    fn test_parse() {
        let key = "2024-03-05".parse::<DateKey>().unwrap();
        assert_eq!(key.date(), date!(2024 - 03 - 05));
        assert!("2024-3-5".parse::<DateKey>().is_err());
        assert!("2024-02-30".parse::<DateKey>().is_err());
        assert!("".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let key = DateKey::from(date!(2024 - 07 - 04));
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-07-04\"");
        let back = serde_json::from_str::<DateKey>("\"2024-07-04\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DateKey>("\"July 4\"").is_err());
    }
}
