use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::consts::{ISO_SEPARATOR, PART_WIDTH, YEAR_WIDTH};
use crate::{JalaliDate, ParseError, calendar, prelude::*};

/// A Gregorian calendar date exchanged with the host as `YYYY-MM-DD`.
///
/// Ordering matches lexicographic ordering of the canonical text, since every
/// component is zero-padded to a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, From, Into)]
pub struct IsoDate(NaiveDate);

impl IsoDate {
    /// Builds an ISO date from Gregorian components
    ///
    /// # Errors
    /// Returns `ParseError::InvalidGregorianDate` if the triple is not a real date.
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ParseError> {
        NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
            .map(Self)
            .ok_or(ParseError::InvalidGregorianDate { year, month, day })
    }

    /// Returns the underlying `chrono` date
    pub const fn naive(self) -> NaiveDate {
        self.0
    }

    /// Converts to the Jalali calendar
    ///
    /// # Errors
    /// Returns `ParseError::OutOfRange` if the date lies outside the supported span.
    pub fn to_jalali(self) -> Result<JalaliDate, ParseError> {
        let (year, month, day) = calendar::naive_to_jalali(self.0)?;
        JalaliDate::from_parts(year, month, day)
    }

    fn parse_part<T: FromStr>(s: &str, width: usize) -> Result<T, ParseError> {
        if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::MalformedInput(s.to_owned()));
        }
        s.parse::<T>()
            .map_err(|_| ParseError::MalformedInput(s.to_owned()))
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for IsoDate {
    type Err = ParseError;

    /// Accepts exactly `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(ISO_SEPARATOR).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::MalformedInput(trimmed.to_owned()));
        };

        let year = Self::parse_part::<i32>(year, YEAR_WIDTH)?;
        let month = Self::parse_part::<u8>(month, PART_WIDTH)?;
        let day = Self::parse_part::<u8>(day, PART_WIDTH)?;

        Self::from_ymd(year, month, day)
    }
}

impl Serialize for IsoDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IsoDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
