use thiserror::Error;

/// Money is stored as integer cents so balances never accumulate
/// floating-point error. 5000 cents = 50.00 currency units.
pub type Cents = i64;

/// Render cents as a decimal string: 5000 -> "50.00", -1 -> "-0.01".
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("invalid money format")]
    InvalidFormat,
    #[error("amounts carry at most two decimal places")]
    TooManyDecimals,
}

/// Parse a decimal string into cents: "50" -> 5000, "12.3" -> 1230.
/// At most two decimal places are accepted.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (units_part, frac_part) = match digits.split_once('.') {
        Some((u, f)) => (u, f),
        None => (digits, ""),
    };

    if units_part.is_empty() && frac_part.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if frac_part.len() > 2 {
        return Err(ParseCentsError::TooManyDecimals);
    }

    let units: i64 = if units_part.is_empty() {
        0
    } else {
        units_part
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?
    };

    let frac: i64 = if frac_part.is_empty() {
        0
    } else {
        // "5" means 50 cents, "05" means 5 cents
        let padded = format!("{:0<2}", frac_part);
        padded.parse().map_err(|_| ParseCentsError::InvalidFormat)?
    };

    let cents = units * 100 + frac;
    Ok(if negative { -cents } else { cents })
}
