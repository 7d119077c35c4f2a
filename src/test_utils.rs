//! Shorthand constructors for tests.

use crate::{IsoDate, JalaliDate};

pub fn iso(s: &str) -> IsoDate {
    s.parse().unwrap()
}

pub fn jalali(year: i32, month: u8, day: u8) -> JalaliDate {
    JalaliDate::from_parts(year, month, day).unwrap()
}
