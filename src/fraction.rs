//! # Exact Fractions
//!
//! Quantities are summed with exact rational arithmetic so that adding
//! `1/3 cup` three times gives exactly `1 cup`. A [`Fraction`] is always kept
//! in lowest terms with a positive denominator.
//!
//! Arithmetic is checked: operations return `None` when the reduced result no
//! longer fits in an `i64` numerator/denominator.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use crate::quantity_parser::{format_quantity, parse_quantity};

/// An exact rational number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numer: i64,
    denom: i64,
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { numer: 0, denom: 1 };
    pub const ONE: Fraction = Fraction { numer: 1, denom: 1 };

    /// Create a fraction, reducing it to lowest terms.
    ///
    /// Returns `None` for a zero denominator.
    ///
    /// ```rust
    /// use ingredient_combiner::fraction::Fraction;
    ///
    /// let half = Fraction::new(2, 4).unwrap();
    /// assert_eq!(half.numer(), 1);
    /// assert_eq!(half.denom(), 2);
    /// assert!(Fraction::new(1, 0).is_none());
    /// ```
    pub fn new(numer: i64, denom: i64) -> Option<Self> {
        Self::reduce(numer as i128, denom as i128)
    }

    /// Create a whole number
    pub fn from_integer(value: i64) -> Self {
        Self {
            numer: value,
            denom: 1,
        }
    }

    fn reduce(numer: i128, denom: i128) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        let sign = if denom < 0 { -1 } else { 1 };
        let divisor = gcd(numer, denom).max(1);
        let numer = i64::try_from(sign * numer / divisor).ok()?;
        let denom = i64::try_from(sign * denom / divisor).ok()?;
        let fraction = Self { numer, denom };
        fraction.check_invariants();
        Some(fraction)
    }

    fn check_invariants(&self) {
        debug_assert!(self.denom > 0, "fraction denominator must be positive");
        debug_assert_eq!(
            gcd(self.numer as i128, self.denom as i128).max(1),
            1,
            "fraction must be in lowest terms"
        );
    }

    pub fn numer(&self) -> i64 {
        self.numer
    }

    pub fn denom(&self) -> i64 {
        self.denom
    }

    pub fn is_zero(&self) -> bool {
        self.numer == 0
    }

    pub fn is_integer(&self) -> bool {
        self.denom == 1
    }

    pub fn is_negative(&self) -> bool {
        self.numer < 0
    }

    pub fn abs(&self) -> Self {
        Self {
            numer: self.numer.abs(),
            denom: self.denom,
        }
    }

    /// Integer part, truncated toward zero
    pub fn trunc(&self) -> i64 {
        self.numer / self.denom
    }

    /// Fractional remainder, carrying the sign of `self`
    pub fn fract(&self) -> Self {
        Self {
            numer: self.numer % self.denom,
            denom: self.denom,
        }
        .normalized()
    }

    fn normalized(self) -> Self {
        // Cannot fail: numerator only shrinks and the denominator is unchanged.
        Self::reduce(self.numer as i128, self.denom as i128).unwrap_or(Self::ZERO)
    }

    pub fn checked_add(&self, other: &Fraction) -> Option<Fraction> {
        let numer = self.numer as i128 * other.denom as i128 + other.numer as i128 * self.denom as i128;
        let denom = self.denom as i128 * other.denom as i128;
        Self::reduce(numer, denom)
    }

    pub fn checked_mul(&self, other: &Fraction) -> Option<Fraction> {
        let numer = self.numer as i128 * other.numer as i128;
        let denom = self.denom as i128 * other.denom as i128;
        Self::reduce(numer, denom)
    }

    /// Approximate value, for logging only
    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.numer as i128 * other.denom as i128;
        let rhs = other.numer as i128 * self.denom as i128;
        lhs.cmp(&rhs)
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_quantity(self))
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_quantity(self))
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_quantity(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn test_reduces_to_lowest_terms() {
        let f = frac(6, 8);
        assert_eq!((f.numer(), f.denom()), (3, 4));
        let f = frac(3, -9);
        assert_eq!((f.numer(), f.denom()), (-1, 3));
        assert_eq!(frac(0, 5), Fraction::ZERO);
    }

    #[test]
    fn test_zero_denominator_rejected() {
        assert!(Fraction::new(3, 0).is_none());
    }

    #[test]
    fn test_exact_addition() {
        let third = frac(1, 3);
        let sum = third
            .checked_add(&third)
            .and_then(|s| s.checked_add(&third))
            .unwrap();
        assert_eq!(sum, Fraction::ONE);
        assert_eq!(frac(1, 2).checked_add(&frac(1, 16)).unwrap(), frac(9, 16));
    }

    #[test]
    fn test_multiplication() {
        assert_eq!(frac(2, 1).checked_mul(&frac(1, 16)).unwrap(), frac(1, 8));
        assert_eq!(frac(3, 4).checked_mul(&Fraction::from(16)).unwrap(), frac(12, 1));
    }

    #[test]
    fn test_overflow_is_reported() {
        let big = Fraction::from(i64::MAX);
        assert!(big.checked_add(&Fraction::ONE).is_none());
        assert!(big.checked_mul(&Fraction::from(2)).is_none());
    }

    #[test]
    fn test_trunc_and_fract() {
        let f = frac(7, 2);
        assert_eq!(f.trunc(), 3);
        assert_eq!(f.fract(), frac(1, 2));
        assert!(frac(4, 2).is_integer());
    }

    #[test]
    fn test_ordering() {
        assert!(frac(1, 3) < frac(1, 2));
        assert!(frac(-1, 2) < Fraction::ZERO);
    }

    #[test]
    fn test_serde_uses_quantity_text() {
        let json = serde_json::to_string(&frac(3, 2)).unwrap();
        assert_eq!(json, "\"1 1/2\"");
        let back: Fraction = serde_json::from_str("\"28.35\"").unwrap();
        assert_eq!(back, frac(567, 20));
    }
}
