//! Prefix number parsing for form and table text.
//!
//! Both parsers accept leading whitespace, an optional sign and the longest
//! numeric prefix, ignoring whatever follows (`"12 ms"` parses as `12`).
//! Text without a numeric prefix yields `f64::NAN`, which compares false
//! against every value; callers rely on that instead of a separate "missing"
//! branch.

/// Parses a base-10 integer prefix.
pub fn parse_int_prefix(src: &str) -> f64 {
    let src = src.trim_start();
    let bytes = src.as_bytes();
    let mut i = 0usize;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let mut parsed_any = false;
    let mut value = 0.0f64;
    while let Some(digit) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
        parsed_any = true;
        value = value * 10.0 + f64::from(digit - b'0');
        i += 1;
    }

    if !parsed_any {
        return f64::NAN;
    }

    if negative { -value } else { value }
}

/// Parses a decimal floating-point prefix, including exponents and
/// `Infinity`.
pub fn parse_float_prefix(src: &str) -> f64 {
    let src = src.trim_start();
    if src.is_empty() {
        return f64::NAN;
    }

    let bytes = src.as_bytes();
    let mut i = 0usize;

    if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    if src[i..].starts_with("Infinity") {
        return if matches!(bytes.first(), Some(b'-')) {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut int_digits = 0usize;
    while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
        int_digits += 1;
        i += 1;
    }

    let mut frac_digits = 0usize;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
            frac_digits += 1;
            i += 1;
        }
    }

    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let exp_start = i;
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }

        let mut exp_digits = 0usize;
        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
            exp_digits += 1;
            i += 1;
        }

        if exp_digits == 0 {
            i = exp_start;
        }
    }

    src[..i].parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefix_ignores_trailing_text_and_fraction() {
        assert_eq!(parse_int_prefix("42"), 42.0);
        assert_eq!(parse_int_prefix("  -7"), -7.0);
        assert_eq!(parse_int_prefix("+3"), 3.0);
        assert_eq!(parse_int_prefix("12px"), 12.0);
        assert_eq!(parse_int_prefix("9.9"), 9.0);
    }

    #[test]
    fn int_prefix_without_digits_is_nan() {
        assert!(parse_int_prefix("").is_nan());
        assert!(parse_int_prefix("abc").is_nan());
        assert!(parse_int_prefix("-").is_nan());
        assert!(parse_int_prefix(".5").is_nan());
    }

    #[test]
    fn nan_sentinel_never_orders() {
        let nan = parse_int_prefix("abc");
        assert!(!(nan > 5.0));
        assert!(!(5.0 > nan));
        assert!(!(nan > nan));
    }

    #[test]
    fn float_prefix_handles_fraction_exponent_and_infinity() {
        assert_eq!(parse_float_prefix("3.25"), 3.25);
        assert_eq!(parse_float_prefix(".5"), 0.5);
        assert_eq!(parse_float_prefix("5."), 5.0);
        assert_eq!(parse_float_prefix("1e3"), 1000.0);
        assert_eq!(parse_float_prefix("2e"), 2.0);
        assert_eq!(parse_float_prefix("4.5 ms"), 4.5);
        assert_eq!(parse_float_prefix("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float_prefix("P1").is_nan());
        assert!(parse_float_prefix("").is_nan());
        assert!(parse_float_prefix("-.").is_nan());
    }
}
