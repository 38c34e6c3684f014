use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Serialize, Serializer};

use super::error::DomainError;

/// Fixed-point decimal using i64 (multiply by 10,000)
///
/// Monetary sums are exact while they stay inside the `i64` range, so within
/// that range the order in which parallel workers fold records never changes
/// a published total. Sums that reach a bound saturate there, and past that
/// point the result may depend on folding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 10_000;
    const FRACTION_DIGITS: usize = 4;

    pub const ZERO: Amount = Amount(0);

    /// Create from raw scaled value
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Get raw scaled value
    pub fn raw(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a plain decimal string (e.g. "19.99", "-3", ".5")
    ///
    /// Digits past the fourth fractional place are rounded half away from zero.
    pub fn from_decimal_str(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();

        let (is_negative, digits) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (integer_part, fraction_part) = digits.split_once('.').unwrap_or((digits, ""));

        if integer_part.is_empty() && fraction_part.is_empty() {
            return Err(DomainError::InvalidAmount);
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer_part) || !all_digits(fraction_part) {
            return Err(DomainError::InvalidAmount);
        }

        let integer: i64 = if integer_part.is_empty() {
            0
        } else {
            integer_part.parse().map_err(|_| DomainError::Overflow)?
        };

        // Keep four digits, pad short fractions ("5" -> "5000")
        let kept = &fraction_part[..fraction_part.len().min(Self::FRACTION_DIGITS)];
        let fraction: i64 = if kept.is_empty() {
            0
        } else {
            format!("{:0<4}", kept)
                .parse()
                .map_err(|_| DomainError::InvalidAmount)?
        };
        let round_up = fraction_part
            .as_bytes()
            .get(Self::FRACTION_DIGITS)
            .is_some_and(|digit| *digit >= b'5');

        let scaled = integer
            .checked_mul(Self::SCALE)
            .and_then(|v| v.checked_add(fraction))
            .and_then(|v| v.checked_add(i64::from(round_up)))
            .ok_or(DomainError::Overflow)?;

        Ok(Self(if is_negative { -scaled } else { scaled }))
    }

    /// Convert from a float, rounding to four fractional digits
    ///
    /// Returns `None` for NaN, infinities and values outside the i64 range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * Self::SCALE as f64).round();
        if scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs_value = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:04}", sign, abs_value / scale, abs_value % scale)
    }
}

// Aggregation never fails; sums pin at the i64 bounds instead of panicking.
impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}
