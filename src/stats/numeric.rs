//! Locale-invariant number parsing for CSV fields.

/// Parse a field as a floating-point number.
///
/// Accepts surrounding whitespace, an optional sign, digits with an optional `.` decimal point,
/// and an optional exponent (`1e3`, `-2.5E-4`, `.5`, `7.`). The decimal separator is always `.`
/// regardless of the process locale. Word forms such as `NaN`, `inf` or `Infinity` are rejected
/// so a column of labels never turns numeric by accident.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    match unsigned.as_bytes().first() {
        Some(b) if b.is_ascii_digit() || *b == b'.' => trimmed.parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_number;

    #[test]
    fn accepts_common_numeric_forms() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("-3.5"), Some(-3.5));
        assert_eq!(parse_number("+0.25"), Some(0.25));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("2.5E-1"), Some(0.25));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("7."), Some(7.0));
        assert_eq!(parse_number("  12  "), Some(12.0));
    }

    #[test]
    fn rejects_text_and_locale_specific_forms() {
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1,5"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("-inf"), None);
        assert_eq!(parse_number("Infinity"), None);
        assert_eq!(parse_number(" "), None);
        assert_eq!(parse_number("-"), None);
    }
}
