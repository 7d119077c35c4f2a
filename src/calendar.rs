//! Jalali ↔ Gregorian conversion.
//!
//! Both calendars are mapped onto a continuous Julian Day Number. The Jalali
//! side follows the published jalaali algorithm (Borkowski): leap years repeat
//! in 33-year sub-cycles which restart at the years listed in
//! [`LEAP_BREAKS`], so no per-year table is needed inside the supported span.

use chrono::{Datelike, NaiveDate};

use crate::ParseError;
use crate::consts::{
    DAYS_IN_MONTH, DAYS_IN_WEEK, ESFAND, ESFAND_DAYS_LEAP, FARVARDIN, GREGORIAN_OFFSET, GRID_ROWS,
    LEAP_BREAKS, LEAP_CYCLE, MAX_MONTH, MAX_YEAR, MIN_DAY, MIN_YEAR,
};

/// Day cells of a month laid out Saturday-first, `None` for padding
pub type MonthLayout = [[Option<u8>; DAYS_IN_WEEK]; GRID_ROWS];

/// Per-year facts derived from the break table.
struct YearInfo {
    /// Gregorian year in which this Jalali year begins
    gregorian_year: i32,
    /// Day of March on which 1 Farvardin falls
    march_day: i32,
}

/// Returns true if `year` lies inside the supported Jalali span
#[inline]
pub const fn in_span(year: i32) -> bool {
    year >= MIN_YEAR as i32 && year <= MAX_YEAR as i32
}

/// Locates the break interval that contains `year`: (start, length).
fn break_interval(year: i32) -> (i32, i32) {
    let mut start = LEAP_BREAKS[0];
    let mut jump = 0;
    for &next in &LEAP_BREAKS[1..] {
        jump = next - start;
        if year < next {
            break;
        }
        start = next;
    }
    (start, jump)
}

fn leap_position(year: i32) -> i32 {
    let (start, jump) = break_interval(year);
    let mut n = year - start;
    if jump - n < 6 {
        n = n - jump + (jump + 4) / LEAP_CYCLE * LEAP_CYCLE;
    }
    let leap = ((n + 1) % LEAP_CYCLE - 1) % 4;
    if leap == -1 { 4 } else { leap }
}

/// Computes the Gregorian anchor of 1 Farvardin.
/// `year` must lie in `LEAP_BREAKS[0]..LEAP_BREAKS[last]`.
fn year_info(year: i32) -> YearInfo {
    let gregorian_year = year + GREGORIAN_OFFSET;
    let mut leap_j = -14;
    let mut start = LEAP_BREAKS[0];
    let mut jump = 0;
    for &next in &LEAP_BREAKS[1..] {
        jump = next - start;
        if year < next {
            break;
        }
        leap_j += jump / LEAP_CYCLE * 8 + (jump % LEAP_CYCLE) / 4;
        start = next;
    }

    let n = year - start;
    leap_j += n / LEAP_CYCLE * 8 + (n % LEAP_CYCLE + 3) / 4;
    if jump % LEAP_CYCLE == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gregorian_year / 4 - (gregorian_year / 100 + 1) * 3 / 4 - 150;

    YearInfo {
        gregorian_year,
        march_day: 20 + leap_j - leap_g,
    }
}

/// Julian Day Number of a proleptic Gregorian date.
fn gregorian_to_jdn(year: i32, month: i32, day: i32) -> i64 {
    let (y, m, d) = (i64::from(year), i64::from(month), i64::from(day));
    let shifted = y + (m - 8) / 6 + 100_100;
    let jdn = shifted * 1461 / 4 + (153 * ((m + 9) % 12) + 2) / 5 + d - 34_840_408;
    jdn - shifted / 100 * 3 / 4 + 752
}

/// Proleptic Gregorian date of a Julian Day Number.
fn jdn_to_gregorian(jdn: i64) -> (i32, i32, i32) {
    let mut j = 4 * jdn + 139_361_631;
    j += (4 * jdn + 183_187_720) / 146_097 * 3 / 4 * 4 - 3908;
    let i = (j % 1461) / 4 * 5 + 308;
    let day = (i % 153) / 5 + 1;
    let month = (i / 153) % 12 + 1;
    let year = j / 1461 - 100_100 + (8 - month) / 6;
    // The ranges involved are bounded by the supported span, far inside i32.
    (year as i32, month as i32, day as i32)
}

fn jalali_to_jdn(year: i32, month: i32, day: i32) -> i64 {
    nowruz_jdn(year) + i64::from((month - 1) * 31 - month / 7 * (month - 7) + day - 1)
}

fn nowruz_jdn(year: i32) -> i64 {
    let info = year_info(year);
    gregorian_to_jdn(info.gregorian_year, 3, info.march_day)
}

fn jdn_to_jalali(jdn: i64) -> Option<(i32, u8, u8)> {
    let first = LEAP_BREAKS[0];
    let last = LEAP_BREAKS[LEAP_BREAKS.len() - 1];
    let (gregorian_year, _, _) = jdn_to_gregorian(jdn);

    // Early in the Gregorian year the date still belongs to the previous Jalali year.
    let mut year = (gregorian_year - GREGORIAN_OFFSET).min(last - 1);
    if year < first {
        return None;
    }
    let mut k = jdn - nowruz_jdn(year);
    if k < 0 {
        year -= 1;
        if year < first {
            return None;
        }
        k = jdn - nowruz_jdn(year);
    }
    let days_in_year = if leap_position(year) == 0 { 366 } else { 365 };
    if k >= days_in_year {
        return None;
    }

    let (month, day) = if k <= 185 {
        (1 + k / 31, k % 31 + 1)
    } else {
        k -= 186;
        (7 + k / 30, k % 30 + 1)
    };
    Some((year, month as u8, day as u8))
}

/// Returns true if the Jalali `year` is leap (Esfand has 30 days).
/// Years outside the supported span are reported as non-leap.
pub fn is_leap_year(year: i32) -> bool {
    in_span(year) && leap_position(year) == 0
}

/// Number of days in a Jalali month, or 0 if `month` is not in `1..=12`
pub fn month_length(year: i32, month: u8) -> u8 {
    match month {
        ESFAND if is_leap_year(year) => ESFAND_DAYS_LEAP,
        FARVARDIN..=MAX_MONTH => DAYS_IN_MONTH[month as usize],
        _ => 0,
    }
}

/// Number of days in a Jalali year
pub fn year_length(year: i32) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Checks whether (year, month, day) names a real Jalali date inside the supported span.
pub fn is_valid_jalali_date(year: i32, month: u8, day: u8) -> bool {
    in_span(year)
        && (FARVARDIN..=MAX_MONTH).contains(&month)
        && (MIN_DAY..=month_length(year, month)).contains(&day)
}

fn check_jalali(year: i32, month: u8, day: u8) -> Result<(), ParseError> {
    if !in_span(year) {
        return Err(ParseError::InvalidYear(year));
    }
    if !(FARVARDIN..=MAX_MONTH).contains(&month) {
        return Err(ParseError::InvalidMonth(month));
    }
    if !(MIN_DAY..=month_length(year, month)).contains(&day) {
        return Err(ParseError::InvalidDay { year, month, day });
    }
    Ok(())
}

/// Converts a Jalali date to its proleptic Gregorian (year, month, day).
///
/// # Errors
/// Returns `InvalidYear`, `InvalidMonth` or `InvalidDay` for input that is not
/// a valid Jalali date inside the supported span.
pub fn jalali_to_gregorian(year: i32, month: u8, day: u8) -> Result<(i32, u8, u8), ParseError> {
    check_jalali(year, month, day)?;
    let jdn = jalali_to_jdn(year, i32::from(month), i32::from(day));
    let (gy, gm, gd) = jdn_to_gregorian(jdn);
    Ok((gy, gm as u8, gd as u8))
}

/// Converts a proleptic Gregorian date to its Jalali (year, month, day).
///
/// # Errors
/// Returns `InvalidGregorianDate` for an impossible Gregorian triple and
/// `OutOfRange` when the date falls outside the supported Jalali span.
pub fn gregorian_to_jalali(year: i32, month: u8, day: u8) -> Result<(i32, u8, u8), ParseError> {
    if NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day)).is_none() {
        return Err(ParseError::InvalidGregorianDate { year, month, day });
    }
    let out_of_range = || ParseError::OutOfRange(format!("{year:04}-{month:02}-{day:02}"));
    let jdn = gregorian_to_jdn(year, i32::from(month), i32::from(day));
    let (jy, jm, jd) = jdn_to_jalali(jdn).ok_or_else(out_of_range)?;
    if !in_span(jy) {
        return Err(out_of_range());
    }
    Ok((jy, jm, jd))
}

/// Converts a `chrono` date to its Jalali (year, month, day).
///
/// # Errors
/// Returns `OutOfRange` when the date falls outside the supported Jalali span.
pub fn naive_to_jalali(date: NaiveDate) -> Result<(i32, u8, u8), ParseError> {
    // month() and day() are at most 12 and 31
    gregorian_to_jalali(date.year(), date.month() as u8, date.day() as u8)
}

/// Converts a Jalali date to a `chrono` date.
///
/// # Errors
/// Same as [`jalali_to_gregorian`].
pub fn jalali_to_naive(year: i32, month: u8, day: u8) -> Result<NaiveDate, ParseError> {
    let (gy, gm, gd) = jalali_to_gregorian(year, month, day)?;
    NaiveDate::from_ymd_opt(gy, u32::from(gm), u32::from(gd))
        .ok_or_else(|| ParseError::OutOfRange(format!("{gy:04}-{gm:02}-{gd:02}")))
}

/// Weekday of the first day of a Jalali month, Saturday = 0 through Friday = 6.
/// Returns `None` for a month outside the supported span.
pub fn first_weekday_of_month(year: i32, month: u8) -> Option<u8> {
    let first = jalali_to_naive(year, month, MIN_DAY).ok()?;
    Some(persian_weekday(first))
}

/// Maps a Gregorian weekday onto the Persian week (Saturday = 0).
pub fn persian_weekday(date: NaiveDate) -> u8 {
    ((date.weekday().num_days_from_sunday() + 1) % DAYS_IN_WEEK as u32) as u8
}

/// Lays out the days of a Jalali month in Persian week rows.
/// Returns `None` for a month outside the supported span.
pub fn month_layout(year: i32, month: u8) -> Option<MonthLayout> {
    let first_weekday = usize::from(first_weekday_of_month(year, month)?);
    let mut cells: MonthLayout = [[None; DAYS_IN_WEEK]; GRID_ROWS];
    for day in MIN_DAY..=month_length(year, month) {
        let pos = first_weekday + usize::from(day) - 1;
        cells[pos / DAYS_IN_WEEK][pos % DAYS_IN_WEEK] = Some(day);
    }
    Some(cells)
}
