mod bounds;
mod calendar;
mod config;
mod consts;
mod digits;
mod field;
mod format;
mod iso;
mod prelude;
#[cfg(test)]
mod test_utils;
mod types;

pub use bounds::{DateBounds, RangeError};
pub use calendar::{
    MonthLayout, first_weekday_of_month, gregorian_to_jalali, in_span, is_leap_year,
    is_valid_jalali_date, jalali_to_gregorian, jalali_to_naive, month_layout, month_length,
    naive_to_jalali, persian_weekday, year_length,
};
pub use config::{ConfigError, DateFieldConfig};
pub use consts::*;
pub use digits::{to_ascii_digits, to_persian_digits};
pub use field::{
    Clock, DateField, FieldChange, FieldEvent, FieldState, FocusObserver, GridCell, MonthGrid,
    Navigation, NoopFocusObserver, SystemClock, ViewCursor,
};
pub use format::{
    auto_insert_separators, format_iso_to_jalali_display, parse_jalali_input,
    parse_jalali_input_to_iso, sanitize_input,
};
pub use iso::IsoDate;
pub use types::{Day, Month, Year};

use crate::prelude::*;
use serde::Deserialize;
use std::str::FromStr;

/// A validated date in the Jalali (Solar Hijri) calendar.
///
/// Construction always checks the day against the month length for that
/// year, so a `JalaliDate` can be converted to Gregorian without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}/{:02}/{:02}", "year.get()", "month.get()", "day.get()")]
pub struct JalaliDate {
    year: Year,
    month: Month,
    day: Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Empty date string")]
    EmptyInput,
    #[display(fmt = "Malformed date input: {_0}")]
    MalformedInput(String),
    #[display(fmt = "Unsupported Jalali year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day: {} (must be {}-{})", "_0", MIN_DAY, MAX_DAY)]
    DayOutOfRange(u8),
    #[display(fmt = "Invalid day {day} for month {year}/{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },
    #[display(fmt = "Invalid Gregorian date {year:04}-{month:02}-{day:02}")]
    InvalidGregorianDate { year: i32, month: u8, day: u8 },
    #[display(fmt = "Date out of range: {_0}")]
    OutOfRange(String),
}

impl std::error::Error for ParseError {}

/// Coarse classification of a [`ParseError`], used for inline field errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Text that does not split into three numeric components
    #[display(fmt = "malformed input")]
    MalformedInput,
    /// Parseable, but no such day exists
    #[display(fmt = "invalid calendar date")]
    InvalidCalendarDate,
    /// A real date outside the supported span or the configured bounds
    #[display(fmt = "out of range")]
    OutOfRange,
}

impl ParseError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput | Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::InvalidMonth(_)
            | Self::DayOutOfRange(_)
            | Self::InvalidDay { .. }
            | Self::InvalidGregorianDate { .. } => ErrorKind::InvalidCalendarDate,
            Self::InvalidYear(_) | Self::OutOfRange(_) => ErrorKind::OutOfRange,
        }
    }
}

impl JalaliDate {
    /// Creates a new date (types are already validated against each other)
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if `day` exceeds the month length.
    pub fn new(year: Year, month: Month, day: Day) -> Result<Self, ParseError> {
        let day = Day::new(day.get(), year.get(), month.get())?;
        Ok(Self { year, month, day })
    }

    /// Creates a date from raw components
    ///
    /// # Errors
    /// Returns `InvalidYear`, `InvalidMonth` or `InvalidDay` for out-of-range components.
    pub fn from_parts(year: i32, month: u8, day: u8) -> Result<Self, ParseError> {
        let year = Year::try_from(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year.get(), month.get())?;
        Ok(Self { year, month, day })
    }

    /// Converts a Gregorian date
    ///
    /// # Errors
    /// Returns `ParseError::OutOfRange` if the date lies outside the supported span.
    pub fn from_iso(iso: IsoDate) -> Result<Self, ParseError> {
        iso.to_jalali()
    }

    /// Returns the year component
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the month component
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day component
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns the Year type
    pub const fn year_typed(&self) -> Year {
        self.year
    }

    /// Returns the Month type
    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Returns the Day type
    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// Returns (year, month, day)
    pub const fn to_tuple(&self) -> (i32, u8, u8) {
        (self.year.get() as i32, self.month.get(), self.day.get())
    }

    /// Converts to a Gregorian ISO date
    ///
    /// # Errors
    /// Only fails if the Gregorian date cannot be represented by `chrono`,
    /// which does not happen inside the supported span.
    pub fn to_iso(&self) -> Result<IsoDate, ParseError> {
        let (year, month, day) = self.to_tuple();
        calendar::jalali_to_naive(year, month, day).map(IsoDate::from)
    }

    /// Weekday in the Persian week, Saturday = 0 through Friday = 6
    pub fn weekday(&self) -> Option<u8> {
        self.to_iso().ok().map(|iso| calendar::persian_weekday(iso.naive()))
    }
}

impl FromStr for JalaliDate {
    type Err = ParseError;

    /// Parses typed Jalali input such as `1403/09/20`, `1403-9-20` or `14030920`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        format::parse_jalali_input(s)
    }
}

impl TryFrom<(i32, u8, u8)> for JalaliDate {
    type Error = ParseError;

    fn try_from(value: (i32, u8, u8)) -> Result<Self, Self::Error> {
        Self::from_parts(value.0, value.1, value.2)
    }
}

impl TryFrom<IsoDate> for JalaliDate {
    type Error = ParseError;

    fn try_from(value: IsoDate) -> Result<Self, Self::Error> {
        value.to_jalali()
    }
}

impl serde::Serialize for JalaliDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for JalaliDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
