use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{BOUNDS_SEPARATOR, IsoDate, OPEN_BOUND, ParseError, calendar};

/// Inclusive limits on selectable dates. Either end may be open.
/// When both ends are set, `min <= max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateBounds {
    min: Option<IsoDate>,
    max: Option<IsoDate>,
}

/// Error type for date bounds operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Minimum date is after maximum date.
    #[error("Invalid date bounds: min ({min}) is after max ({max})")]
    InvalidRange { min: IsoDate, max: IsoDate },

    /// Error parsing a bound.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid bounds format.
    #[error("Invalid bounds format: {0}")]
    InvalidFormat(String),
}

impl DateBounds {
    /// Bounds that accept every date
    pub const UNBOUNDED: Self = Self { min: None, max: None };

    /// Creates new bounds with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if both ends are set and min > max.
    pub fn new(min: Option<IsoDate>, max: Option<IsoDate>) -> Result<Self, RangeError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(RangeError::InvalidRange { min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// Returns the inclusive lower bound
    pub const fn min(&self) -> Option<IsoDate> {
        self.min
    }

    /// Returns the inclusive upper bound
    pub const fn max(&self) -> Option<IsoDate> {
        self.max
    }

    /// Returns true if neither end is set
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Checks if `date` falls inside the bounds; a date equal to a bound is inside.
    pub fn contains(&self, date: IsoDate) -> bool {
        self.min.is_none_or(|min| min <= date) && self.max.is_none_or(|max| date <= max)
    }

    /// True when the Jalali day cannot be selected: it is not a real date, or
    /// its Gregorian equivalent falls outside the bounds.
    pub fn is_date_disabled(&self, year: i32, month: u8, day: u8) -> bool {
        if !calendar::is_valid_jalali_date(year, month, day) {
            return true;
        }
        calendar::jalali_to_naive(year, month, day)
            .map(|date| !self.contains(IsoDate::from(date)))
            .unwrap_or(true)
    }

    /// Checks a date against the bounds.
    ///
    /// # Errors
    /// Returns `ParseError::OutOfRange` naming the violated bound.
    pub fn check(&self, date: IsoDate) -> Result<IsoDate, ParseError> {
        if let Some(min) = self.min.filter(|&min| date < min) {
            return Err(ParseError::OutOfRange(format!("{date} is before {min}")));
        }
        if let Some(max) = self.max.filter(|&max| date > max) {
            return Err(ParseError::OutOfRange(format!("{date} is after {max}")));
        }
        Ok(date)
    }

    fn parse_end(s: &str) -> Result<Option<IsoDate>, RangeError> {
        let trimmed = s.trim();
        if trimmed == OPEN_BOUND {
            return Ok(None);
        }
        Ok(Some(trimmed.parse::<IsoDate>()?))
    }
}

impl fmt::Display for DateBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.min {
            Some(min) => write!(f, "{min}")?,
            None => f.write_str(OPEN_BOUND)?,
        }
        write!(f, "{BOUNDS_SEPARATOR}")?;
        match self.max {
            Some(max) => write!(f, "{max}"),
            None => f.write_str(OPEN_BOUND),
        }
    }
}

impl FromStr for DateBounds {
    type Err = RangeError;

    /// Parses ISO 8601 interval notation: `min/max`, with `..` for an open end.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let separator_count = trimmed.matches(BOUNDS_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No bounds separator found (expected '{BOUNDS_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (min_str, max_str) = trimmed.split_once(BOUNDS_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!(
                        "Separator '{BOUNDS_SEPARATOR}' not found despite count == 1"
                    ))
                })?;
                Self::new(Self::parse_end(min_str)?, Self::parse_end(max_str)?)
            }
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{BOUNDS_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl Serialize for DateBounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateBounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
