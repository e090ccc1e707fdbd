//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:  0.1 + 0.2 = 0.30000000000000004   ❌ WRONG!    │
//! │                                                                     │
//! │  OUR SOLUTION: integer minor units (kopiykas)                       │
//! │    "50.00 ₴" is stored as 5000                                      │
//! │    The store, the write-off math and the API all use minor units.   │
//! │    Only the display boundary formats to "50.00 ₴".                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sklad_core::money::Money;
//!
//! let price = Money::from_string("50.00 \u{20B4}").unwrap();
//! assert_eq!(price.minor_units(), 5000);
//! assert_eq!(price.to_string(), "50.00 \u{20B4}");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ParseError;

/// The currency glyph appended by [`Money::format_price`] and stripped by
/// [`Money::from_string`] (hryvnia sign).
pub const CURRENCY_SIGN: &str = "\u{20B4}";

/// Fixed display scale: two decimal digits.
const DECIMALS: usize = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (1/100 of the display
/// unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: room for aggregate sums without overflow
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support; serialized as a bare integer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parses a display string into minor units.
    ///
    /// The currency glyph and any whitespace are stripped, then the string is
    /// split on the decimal point. The fractional part is right-padded with
    /// zeros to exactly two digits and truncated if longer.
    ///
    /// ## Errors
    /// Fails when the string contains no decimal point (or more than one),
    /// or when either part is not numeric.
    ///
    /// ## Example
    /// ```rust
    /// use sklad_core::money::Money;
    ///
    /// assert_eq!(Money::from_string("12.5").unwrap().minor_units(), 1250);
    /// assert_eq!(Money::from_string("12.505").unwrap().minor_units(), 1250);
    /// assert!(Money::from_string("12").is_err());
    /// ```
    pub fn from_string(input: &str) -> Result<Self, ParseError> {
        let cleaned: String = input
            .replace(CURRENCY_SIGN, "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let mut parts = cleaned.split('.');
        let (prefix, suffix) = match (parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(suffix), None) => (prefix, suffix),
            _ => {
                return Err(ParseError::Money {
                    input: input.to_string(),
                    reason: "expected exactly one decimal point".to_string(),
                })
            }
        };

        let whole: i64 = prefix.parse().map_err(|_| ParseError::Money {
            input: input.to_string(),
            reason: "integer part is not numeric".to_string(),
        })?;

        let mut fraction = suffix.to_string();
        while fraction.len() < DECIMALS {
            fraction.push('0');
        }
        fraction.truncate(DECIMALS);

        let fraction: i64 = fraction.parse().map_err(|_| ParseError::Money {
            input: input.to_string(),
            reason: "fractional part is not numeric".to_string(),
        })?;

        Ok(Money(whole * 100 + fraction))
    }

    /// Formats minor units as a display price, e.g. `5000` -> `"50.00 ₴"`.
    pub fn format_price(minor_units: i64) -> String {
        let sign = if minor_units < 0 { "-" } else { "" };
        format!(
            "{}{}.{:02} {}",
            sign,
            (minor_units / 100).abs(),
            (minor_units % 100).abs(),
            CURRENCY_SIGN
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Money::format_price(self.0))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity (for line totals).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string_plain() {
        assert_eq!(Money::from_string("50.00").unwrap().minor_units(), 5000);
        assert_eq!(Money::from_string("12.5").unwrap().minor_units(), 1250);
        assert_eq!(Money::from_string("0.07").unwrap().minor_units(), 7);
    }

    #[test]
    fn test_from_string_strips_sign_and_whitespace() {
        let input = format!(" 50.00 {}", CURRENCY_SIGN);
        assert_eq!(Money::from_string(&input).unwrap().minor_units(), 5000);
    }

    #[test]
    fn test_from_string_pads_and_truncates_fraction() {
        // "5." pads to "00"
        assert_eq!(Money::from_string("5.").unwrap().minor_units(), 500);
        // "12.505" truncates to "50"
        assert_eq!(Money::from_string("12.505").unwrap().minor_units(), 1250);
    }

    #[test]
    fn test_from_string_rejects_bad_input() {
        // No decimal point
        assert!(Money::from_string("50").is_err());
        // Two decimal points
        assert!(Money::from_string("5.0.0").is_err());
        // Non-numeric integer part
        assert!(Money::from_string("abc.50").is_err());
        // Non-numeric fraction
        assert!(Money::from_string("5.x").is_err());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(Money::format_price(5000), format!("50.00 {}", CURRENCY_SIGN));
        assert_eq!(Money::format_price(7), format!("0.07 {}", CURRENCY_SIGN));
        assert_eq!(Money::format_price(-550), format!("-5.50 {}", CURRENCY_SIGN));
    }

    /// format_price(from_string(s)) reproduces the numeric value of s.
    #[test]
    fn test_round_trip() {
        for s in ["12.50", "0.01", "999.9", "7.00"] {
            let parsed = Money::from_string(s).unwrap();
            let formatted = parsed.to_string();
            let reparsed = Money::from_string(&formatted).unwrap();
            assert_eq!(parsed, reparsed, "round trip failed for {s}");
        }
    }

    #[test]
    fn test_serializes_as_bare_minor_units() {
        let money = Money::from_minor_units(1250);
        assert_eq!(serde_json::to_value(money).unwrap(), serde_json::json!(1250));

        let back: Money = serde_json::from_value(serde_json::json!(1250)).unwrap();
        assert_eq!(back, money);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor_units(1000);
        let b = Money::from_minor_units(500);

        assert_eq!((a + b).minor_units(), 1500);
        assert_eq!((a - b).minor_units(), 500);
        assert_eq!((a * 3).minor_units(), 3000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.minor_units(), 2000);
    }
}
