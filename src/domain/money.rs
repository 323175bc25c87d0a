use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// For INR/EUR/USD, 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "1.5e2" -> 15000
///
/// Accepts an optional sign, `_` between digits and an exponent. The value
/// must be exact in cents: "0.005" is rejected, "1.500" is not.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, rest) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (rest, None),
    };
    let (units_str, decimal_str) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let units = digits_without_separators(units_str)?;
    let decimals = digits_without_separators(decimal_str)?;
    if units.is_empty() && decimals.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    let exponent = match exponent {
        Some(text) => parse_exponent(text)?,
        None => 0,
    };

    // value = digits * 10^(exponent - decimals.len()), so cents need a shift of 2 more
    let digits = format!("{units}{decimals}");
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    let shift = exponent + 2 - decimals.len() as i64;

    let cents = if shift >= 0 {
        let scale = u32::try_from(shift)
            .ok()
            .and_then(|s| 10_i64.checked_pow(s))
            .ok_or(ParseCentsError::Overflow)?;
        digits_to_i64(digits)?
            .checked_mul(scale)
            .ok_or(ParseCentsError::Overflow)?
    } else {
        let dropped = usize::try_from(-shift).map_err(|_| ParseCentsError::TooPrecise)?;
        if dropped >= digits.len() {
            return Err(ParseCentsError::TooPrecise);
        }
        let (kept, tail) = digits.split_at(digits.len() - dropped);
        if tail.bytes().any(|b| b != b'0') {
            return Err(ParseCentsError::TooPrecise);
        }
        digits_to_i64(kept)?
    };

    Ok(if negative { -cents } else { cents })
}

/// Strip `_` separators, which are only allowed between two digits.
fn digits_without_separators(text: &str) -> Result<String, ParseCentsError> {
    let bytes = text.as_bytes();
    let mut digits = String::with_capacity(text.len());
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'0'..=b'9' => digits.push(b as char),
            b'_' if i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) => {}
            _ => return Err(ParseCentsError::InvalidFormat),
        }
    }
    Ok(digits)
}

const MAX_EXPONENT: i64 = 1_000_000;

fn parse_exponent(text: &str) -> Result<i64, ParseCentsError> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits = digits_without_separators(rest)?;
    if digits.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    let digits = digits.trim_start_matches('0');
    // Exponents this large already overflow or underflow cents for any non-zero value
    let value = if digits.len() > 6 {
        MAX_EXPONENT
    } else if digits.is_empty() {
        0
    } else {
        digits_to_i64(digits)?.min(MAX_EXPONENT)
    };
    Ok(if negative { -value } else { value })
}

fn digits_to_i64(digits: &str) -> Result<i64, ParseCentsError> {
    digits.bytes().try_fold(0_i64, |acc, b| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(i64::from(b - b'0')))
            .ok_or(ParseCentsError::Overflow)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    TooPrecise,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::TooPrecise => write!(f, "amount has more than two decimal places"),
            ParseCentsError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(36550), "365.50");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("250"), Ok(25000));
        assert_eq!(parse_cents("75.5"), Ok(7550));
        assert_eq!(parse_cents("12.34"), Ok(1234));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("40."), Ok(4000));
        assert_eq!(parse_cents(" 7 "), Ok(700));
        assert_eq!(parse_cents("+3"), Ok(300));
        assert_eq!(parse_cents("-50.00"), Ok(-5000));
        assert_eq!(parse_cents("007.10"), Ok(710));
    }

    #[test]
    fn test_parse_cents_trailing_zeros_are_exact() {
        assert_eq!(parse_cents("1.500"), Ok(150));
        assert_eq!(parse_cents("0.000"), Ok(0));
    }

    #[test]
    fn test_parse_cents_rejects_sub_cent_amounts() {
        assert_eq!(parse_cents("100.999"), Err(ParseCentsError::TooPrecise));
        assert_eq!(parse_cents("0.005"), Err(ParseCentsError::TooPrecise));
        assert_eq!(parse_cents("1e-3"), Err(ParseCentsError::TooPrecise));
    }

    #[test]
    fn test_parse_cents_exponent() {
        assert_eq!(parse_cents("1e3"), Ok(100000));
        assert_eq!(parse_cents("1E3"), Ok(100000));
        assert_eq!(parse_cents("1.5e2"), Ok(15000));
        assert_eq!(parse_cents("2.5e-1"), Ok(25));
        assert_eq!(parse_cents("125e-2"), Ok(125));
        assert_eq!(parse_cents("1e+2"), Ok(10000));
        assert_eq!(parse_cents("0e999999999"), Ok(0));
    }

    #[test]
    fn test_parse_cents_digit_separators() {
        assert_eq!(parse_cents("1_000"), Ok(100000));
        assert_eq!(parse_cents("1_000.5_0"), Ok(100050));
        assert_eq!(parse_cents("_1000"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1000_"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1__000"), Err(ParseCentsError::InvalidFormat));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert_eq!(parse_cents("abc"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents(""), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("."), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("12.34.56"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("--5"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("e3"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1e"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("inf"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("nan"), Err(ParseCentsError::InvalidFormat));
    }

    #[test]
    fn test_parse_cents_overflow() {
        assert_eq!(
            parse_cents("999999999999999999999"),
            Err(ParseCentsError::Overflow)
        );
        assert_eq!(parse_cents("1e30"), Err(ParseCentsError::Overflow));
        assert_eq!(parse_cents("1e9999999"), Err(ParseCentsError::Overflow));
    }
}
