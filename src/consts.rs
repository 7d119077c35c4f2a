/// Earliest supported Jalali year (inclusive)
pub const MIN_YEAR: u16 = 1;

/// Latest supported Jalali year (inclusive), bounded by the last leap break
pub const MAX_YEAR: u16 = 3177;

/// Maximum valid month (Esfand)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Longest month length in the Jalali calendar
pub const MAX_DAY: u8 = 31;

/// Month number for Farvardin
pub const FARVARDIN: u8 = 1;
/// Month number for Esfand
pub const ESFAND: u8 = 12;

/// Days in Esfand for leap years
pub const ESFAND_DAYS_LEAP: u8 = 30;

/// Days in each Jalali month (index 0 is unused, months are 1-indexed)
/// Esfand shows 29 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // Farvardin
    31, // Ordibehesht
    31, // Khordad
    31, // Tir
    31, // Mordad
    31, // Shahrivar
    30, // Mehr
    30, // Aban
    30, // Azar
    30, // Dey
    30, // Bahman
    29, // Esfand (non-leap, adjusted by is_leap_year check)
];

/// Jalali month names, transliterated.
pub const MONTH_NAMES: [&str; 12] = [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand",
];

/// Persian week day names, Saturday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Shanbe",
    "Yekshanbe",
    "Doshanbe",
    "Seshanbe",
    "Chaharshanbe",
    "Panjshanbe",
    "Jome",
];

/// Days per week
pub const DAYS_IN_WEEK: usize = 7;
/// Rows in a month grid; enough for a 31-day month starting on the last weekday
pub const GRID_ROWS: usize = 6;

/// Years at which the 33-year leap sub-cycles restart (jalaali algorithm).
/// The first entry is the earliest computable year, the last is one past the
/// latest.
pub(crate) const LEAP_BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];
/// Length of the leap sub-cycle in years
pub(crate) const LEAP_CYCLE: i32 = 33;
/// Offset between the Jalali and Gregorian year numbering
pub(crate) const GREGORIAN_OFFSET: i32 = 621;

/// Jalali display separator (`YYYY/MM/DD`)
pub const DISPLAY_SEPARATOR: char = '/';
/// Alternate separator accepted in typed input
pub const ALT_SEPARATOR: char = '-';
/// ISO 8601 date component separator
pub const ISO_SEPARATOR: char = '-';
/// Bounds separator (ISO 8601 interval format)
pub const BOUNDS_SEPARATOR: char = '/';
/// Open end marker in bounds text (ISO 8601 interval format)
pub const OPEN_BOUND: &str = "..";

/// Digits in a complete, unseparated Jalali input (`YYYYMMDD`)
pub const FULL_INPUT_DIGITS: usize = 8;
/// Length of a canonical display string (`YYYY/MM/DD`)
pub const DISPLAY_LEN: usize = 10;
/// Width of the year component in fixed-width forms
pub const YEAR_WIDTH: usize = 4;
/// Width of the month and day components in fixed-width forms
pub const PART_WIDTH: usize = 2;
