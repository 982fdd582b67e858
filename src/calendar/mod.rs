mod grid;
mod key;
mod month;
mod widget;
pub(crate) use self::grid::MonthGrid;
pub(crate) use self::key::{DateKey, InvalidDateKey};
pub(crate) use self::month::{MonthCursor, OutOfTimeError};
pub(crate) use self::widget::{CalendarLayout, CalendarWidget, Hit};
