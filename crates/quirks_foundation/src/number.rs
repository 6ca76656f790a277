//! Conversions between numbers and their textual form.
//!
//! [`number_to_string`] is `Number::toString(x)` for radix 10 and
//! [`string_to_number`] is the `StringToNumber` abstract operation. Both are
//! total; invalid text yields NaN rather than an error.

/// Formats a number the way `String(x)` does.
///
/// Uses the shortest digit string that round-trips, in plain decimal
/// notation while the decimal exponent lies in `[-6, 21)` and in exponential
/// notation (`1.2e+34`) outside that range.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn number_to_string(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x == 0.0 {
        // Both +0 and -0
        return "0".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x < 0.0 {
        return format!("-{}", number_to_string(-x));
    }

    let (digits, n) = shortest_digits(x);
    let k = digits.len() as i32;

    if k <= n && n <= 21 {
        let mut out = digits;
        out.extend(std::iter::repeat_n('0', (n - k) as usize));
        out
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let e = n - 1;
        let sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", e.abs())
        }
    }
}

/// Returns the shortest round-trip digits of a positive finite number and the
/// position `n` of the decimal point relative to them, so that
/// `x = 0.d1d2...dk * 10^n`.
fn shortest_digits(x: f64) -> (String, i32) {
    // `{:e}` prints the shortest representation that parses back to `x`.
    let formatted = format!("{x:e}");
    let (mantissa, exponent) = formatted
        .split_once('e')
        .unwrap_or((formatted.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    (digits, exponent + 1)
}

/// Returns true for the characters `StringToNumber` trims: `WhiteSpace` and
/// `LineTerminator`.
#[must_use]
pub fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Converts text to a number the way `Number(text)` does.
///
/// - Surrounding whitespace is ignored; empty text is `0`.
/// - `Infinity` with an optional sign is accepted.
/// - Decimal literals with optional sign, fraction and exponent are accepted;
///   a leading `0` does not switch to octal (`"09"` is `9`).
/// - `0x`, `0o` and `0b` prefixes select another radix (no sign allowed).
/// - Anything else, including trailing garbage, is NaN.
#[must_use]
pub fn string_to_number(input: &str) -> f64 {
    let s = input.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }
    if let Some(value) = parse_non_decimal(s) {
        return value;
    }
    parse_decimal(s).unwrap_or(f64::NAN)
}

fn parse_non_decimal(s: &str) -> Option<f64> {
    let radix = match s.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

fn parse_decimal(s: &str) -> Option<f64> {
    let (negative, body) = match s.as_bytes().first() {
        Some(b'+') => (false, &s[1..]),
        Some(b'-') => (true, &s[1..]),
        _ => (false, s),
    };

    let magnitude = if body == "Infinity" {
        f64::INFINITY
    } else if is_decimal_literal(body) {
        body.parse::<f64>().ok()?
    } else {
        return None;
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Checks `StrUnsignedDecimalLiteral` syntax (minus `Infinity`).
fn is_decimal_literal(body: &str) -> bool {
    let bytes = body.as_bytes();
    let mut i = 0;

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digit_count = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digit_count += i - frac_start;
    }

    if digit_count == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}
