//! Unit price held in hundredths.
//!
//! Prices are stored as an integer count of cents so that the two-decimal text
//! form written to disk reads back to exactly the same value.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Price of one unit, in the smallest currency unit (cents).
///
/// Negative prices are representable and are not rejected.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parse a decimal price, accepting either `.` or `,` as the separator.
    ///
    /// More than two fractional digits are rounded half away from zero.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let normalized = input.trim().replace(',', ".");
        if normalized.is_empty() {
            return Err(DomainError::validation("price is empty"));
        }

        if let Some(cents) = parse_plain_decimal(&normalized) {
            return Ok(Self(cents));
        }

        // Exponent forms ("1e2") are still accepted through the float parser.
        let value: f64 = normalized
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid price: {input:?}")))?;
        if !value.is_finite() || value.abs() > (i64::MAX / 100) as f64 {
            return Err(DomainError::validation(format!("price out of range: {input:?}")));
        }
        Ok(Self((value * 100.0).round() as i64))
    }
}

/// `[+-]?digits[.digits]` without going through floating point.
fn parse_plain_decimal(s: &str) -> Option<i64> {
    let (negative, body) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (whole, frac) = match body.split_once('.') {
        Some((w, f)) => (w, f),
        None => (body, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let digits = frac.as_bytes();
    let digit = |i: usize| digits.get(i).map_or(0, |d| i64::from(d - b'0'));

    let mut cents = whole.checked_mul(100)?.checked_add(digit(0) * 10 + digit(1))?;
    if digit(2) >= 5 {
        cents = cents.checked_add(1)?;
    }

    Some(if negative { -cents } else { cents })
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Always two fractional digits with a `.` separator, regardless of locale.
impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
