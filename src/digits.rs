//! Digit glyph normalization.
//!
//! Persian keyboards produce Extended Arabic-Indic digits (`۰`–`۹`), Arabic
//! keyboards produce Arabic-Indic digits (`٠`–`٩`) and some IMEs emit
//! fullwidth digits (`０`–`９`). Parsing only understands ASCII, so text is
//! folded before anything else looks at it.

/// Zero glyph of each digit block that is folded to ASCII.
const DIGIT_ZEROS: [char; 3] = [
    '\u{06F0}', // Extended Arabic-Indic (Persian)
    '\u{0660}', // Arabic-Indic
    '\u{FF10}', // Fullwidth
];

const PERSIAN_ZERO: char = '\u{06F0}';

/// Returns the ASCII digit for any supported digit glyph.
fn ascii_digit(c: char) -> Option<char> {
    DIGIT_ZEROS.iter().find_map(|&zero| {
        let offset = u32::from(c).checked_sub(u32::from(zero))?;
        if offset < 10 {
            char::from_digit(offset, 10)
        } else {
            None
        }
    })
}

/// Maps Persian, Arabic-Indic and fullwidth digits to ASCII `0`–`9`.
/// Every other character passes through unchanged.
pub fn to_ascii_digits(text: &str) -> String {
    text.chars().map(|c| ascii_digit(c).unwrap_or(c)).collect()
}

/// Maps ASCII digits to Persian glyphs for display.
pub fn to_persian_digits(text: &str) -> String {
    text.chars()
        .map(|c| {
            c.to_digit(10)
                .and_then(|d| char::from_u32(u32::from(PERSIAN_ZERO) + d))
                .unwrap_or(c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persian_digits() {
        assert_eq!(to_ascii_digits("۱۴۰۳/۰۹/۲۰"), "1403/09/20");
    }

    #[test]
    fn test_arabic_indic_digits() {
        assert_eq!(to_ascii_digits("٠١٢٣٤٥٦٧٨٩"), "0123456789");
    }

    #[test]
    fn test_fullwidth_digits() {
        assert_eq!(to_ascii_digits("１４０３"), "1403");
    }

    #[test]
    fn test_mixed_and_passthrough() {
        assert_eq!(to_ascii_digits("۱4٠3-a ب"), "1403-a ب");
        assert_eq!(to_ascii_digits(""), "");
        // neighbors of the digit blocks are untouched
        assert_eq!(to_ascii_digits("\u{06EF}\u{06FA}"), "\u{06EF}\u{06FA}");
    }

    #[test]
    fn test_idempotent() {
        let samples = ["۱۴۰۳/۰۹/۲۰", "12٣٤x", "abc", "１۲3٤", "", "۹۹۹۹۹"];
        for sample in samples {
            let once = to_ascii_digits(sample);
            assert_eq!(to_ascii_digits(&once), once, "{sample}");
        }
    }

    #[test]
    fn test_to_persian_digits() {
        assert_eq!(to_persian_digits("1403/09/20"), "۱۴۰۳/۰۹/۲۰");
        assert_eq!(to_ascii_digits(&to_persian_digits("2024-12-10")), "2024-12-10");
    }
}
