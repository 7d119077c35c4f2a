//! Parsing typed Jalali input and formatting ISO dates for display.

use std::str::FromStr;

use crate::consts::{
    ALT_SEPARATOR, DISPLAY_LEN, DISPLAY_SEPARATOR, FULL_INPUT_DIGITS, PART_WIDTH, YEAR_WIDTH,
};
use crate::digits::to_ascii_digits;
use crate::{IsoDate, JalaliDate, ParseError};

const fn is_separator(c: char) -> bool {
    c == DISPLAY_SEPARATOR || c == ALT_SEPARATOR
}

/// Parses one numeric component of at most `max_width` ASCII digits
fn parse_part<T: FromStr>(s: &str, max_width: usize) -> Result<T, ParseError> {
    if s.is_empty() || s.len() > max_width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::MalformedInput(s.to_owned()));
    }
    s.parse::<T>()
        .map_err(|_| ParseError::MalformedInput(s.to_owned()))
}

/// Parses user-typed Jalali input.
///
/// Accepted shapes, after digit normalization and trimming:
/// - `YYYY/MM/DD` or `YYYY-MM-DD` with unpadded month and day allowed (`1403/9/1`)
/// - `YYYYMMDD`, split 4-2-2
///
/// # Errors
/// `EmptyInput`/`MalformedInput` when the text does not split into three
/// numbers, `InvalidYear`/`InvalidMonth`/`InvalidDay` when it does but names
/// no supported Jalali date.
pub fn parse_jalali_input(text: &str) -> Result<JalaliDate, ParseError> {
    let normalized = to_ascii_digits(text);
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let has_slash = trimmed.contains(DISPLAY_SEPARATOR);
    let has_hyphen = trimmed.contains(ALT_SEPARATOR);
    if has_slash && has_hyphen {
        return Err(ParseError::MalformedInput(format!(
            "Mixed delimiters ({DISPLAY_SEPARATOR} and {ALT_SEPARATOR}): {trimmed}"
        )));
    }

    let (year, month, day) = if has_slash || has_hyphen {
        let separator = if has_slash { DISPLAY_SEPARATOR } else { ALT_SEPARATOR };
        let parts: Vec<&str> = trimmed.split(separator).map(str::trim).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::MalformedInput(format!(
                "Expected 3 components separated by '{separator}', found {}: {trimmed}",
                parts.len()
            )));
        };
        (*year, *month, *day)
    } else {
        if trimmed.len() != FULL_INPUT_DIGITS || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::MalformedInput(trimmed.to_owned()));
        }
        let (year, rest) = trimmed.split_at(YEAR_WIDTH);
        let (month, day) = rest.split_at(PART_WIDTH);
        (year, month, day)
    };

    let year = parse_part::<u16>(year, YEAR_WIDTH)?;
    let month = parse_part::<u8>(month, PART_WIDTH)?;
    let day = parse_part::<u8>(day, PART_WIDTH)?;

    JalaliDate::from_parts(i32::from(year), month, day)
}

/// Parses typed Jalali input into a Gregorian ISO date.
/// Returns `None` for anything [`parse_jalali_input`] rejects.
pub fn parse_jalali_input_to_iso(text: &str) -> Option<IsoDate> {
    parse_jalali_input(text)
        .and_then(|date| date.to_iso())
        .ok()
}

/// Formats an ISO date (`YYYY-MM-DD`) as Jalali display text (`YYYY/MM/DD`).
/// Returns `None` if `iso` is malformed or outside the supported span.
pub fn format_iso_to_jalali_display(iso: &str) -> Option<String> {
    let iso: IsoDate = iso.parse().ok()?;
    iso.to_jalali().ok().map(|date| date.to_string())
}

/// Inserts `/` after the 4th digit and after the 7th character while the
/// user types straight digits, so `14030920` reads `1403/09/20`.
/// Separators the user typed are left alone.
pub fn auto_insert_separators(partial: &str) -> String {
    let mut chars: Vec<char> = partial.chars().collect();

    let year_end = YEAR_WIDTH;
    if chars.len() > year_end && chars[..=year_end].iter().all(char::is_ascii_digit) {
        chars.insert(year_end, DISPLAY_SEPARATOR);
    }

    let month_end = YEAR_WIDTH + 1 + PART_WIDTH;
    if chars.len() > month_end
        && is_separator(chars[year_end])
        && chars[year_end + 1..=month_end].iter().all(char::is_ascii_digit)
    {
        chars.insert(month_end, DISPLAY_SEPARATOR);
    }

    chars.into_iter().collect()
}

/// Cleans raw field text: folds digits to ASCII, drops anything that is not
/// a digit or separator, unifies separators to `/`, inserts missing
/// separators and caps the result at the display width.
pub fn sanitize_input(raw: &str) -> String {
    let filtered: String = to_ascii_digits(raw)
        .chars()
        .filter(|&c| c.is_ascii_digit() || is_separator(c))
        .map(|c| if c == ALT_SEPARATOR { DISPLAY_SEPARATOR } else { c })
        .collect();

    auto_insert_separators(&filtered)
        .chars()
        .take(DISPLAY_LEN)
        .collect()
}

/// Number of ASCII digits in `text`
pub(crate) fn digit_count(text: &str) -> usize {
    text.bytes().filter(u8::is_ascii_digit).count()
}
