//! Numeric text helpers: parsing, precision inference and fixed-point output.

/// Parse a decimal numeric string, ignoring surrounding whitespace.
///
/// Accepts an optional sign, fraction and exponent (`"-1.5e3"`, `".5"`, `"5."`).
/// Empty input and non-finite results yield `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    // `f64::from_str` also accepts "inf"/"nan" spellings; require a digit.
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Number of digits written after the decimal point in `raw`.
///
/// Counting stops at the first non-digit, so `"1.50e3"` has two.
pub fn decimal_digits(raw: &str) -> usize {
    match raw.trim().split_once('.') {
        Some((_, frac)) => frac.bytes().take_while(u8::is_ascii_digit).count(),
        None => 0,
    }
}

/// Decimal places needed to show both endpoints as they were written.
#[inline]
pub fn precision_for(start_raw: &str, end_raw: &str) -> usize {
    decimal_digits(start_raw).max(decimal_digits(end_raw))
}

/// Fixed-point rendering with exactly `precision` decimals, never scientific.
pub fn format_fixed(value: f64, precision: usize) -> String {
    // Negative zero prints as "-0"; a counter should show "0".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.precision$}")
}
