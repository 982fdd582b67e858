use time::{Date, OffsetDateTime, UtcOffset};

/// Source of "today" for highlighting and the jump-to-today command
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Clock {
    /// The system clock seen through a UTC offset captured at start-up.  The
    /// offset has to be read before any other thread is spawned, as `time`
    /// refuses to look it up afterwards on some platforms.
    Local(UtcOffset),
    #[cfg(test)]
    Fixed(Date),
}

impl Clock {
    pub(crate) fn today(self) -> Date {
        match self {
            Clock::Local(offset) => OffsetDateTime::now_utc().to_offset(offset).date(),
            #[cfg(test)]
            Clock::Fixed(date) => date,
        }
    }
}
