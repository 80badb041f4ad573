//! Best-effort number parsing for catalog fields that mix digits and text.

/// Splits off an optional sign followed by ASCII digits at the start of `s`
fn signed_digits(s: &str) -> (&str, &str) {
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits_len = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    s.split_at(sign_len + digits_len)
}

/// Parses the integer prefix of a string, ignoring leading whitespace.
///
/// `"150A"` yields 150, `"4.5"` yields 4 and `"ABC"` yields `None`.
pub fn leading_integer(s: &str) -> Option<i64> {
    let (number, _) = signed_digits(s.trim_start());
    number.parse().ok()
}

/// Parses the decimal prefix of a string, ignoring leading whitespace.
///
/// `"12.5x"` yields 12.5, `"10A"` yields 10 and `"X10"` yields `None`.
pub fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let (whole, rest) = signed_digits(s);

    let fraction_len = rest
        .strip_prefix('.')
        .map(|fraction| 1 + fraction.bytes().take_while(u8::is_ascii_digit).count())
        .unwrap_or(0);

    let number = &s[..whole.len() + fraction_len];
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}
