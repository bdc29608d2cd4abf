//! Exact numbers used as the values of constant nodes.

use rug::{ops::Pow, Integer, Rational};
use std::{cmp::Ordering, fmt, ops::{Add, Mul, Neg, Sub}};

/// The largest exponent magnitude the simplifier will evaluate exactly.
///
/// Powers beyond this are left symbolic, so that an input like `10^100000` does not allocate an
/// enormous integer.
pub const MAX_EXPONENT: u32 = 1024;

/// The largest numerator or denominator, in bits, that a power may produce.
///
/// Nested powers such as `((2^1024)^1024)^1024` stay within [`MAX_EXPONENT`] at every level, so
/// the size of the result is bounded separately.
pub const MAX_POWER_BITS: u64 = 1 << 16;

/// An exact, arbitrary-precision rational number.
///
/// Parsed integers and decimals are represented exactly (`3.14` is `157/50`), so arithmetic never
/// loses precision.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Number(Rational);

impl Number {
    /// Returns the number zero.
    pub fn zero() -> Self {
        Self(Rational::new())
    }

    /// Returns the number one.
    pub fn one() -> Self {
        Self::from(1)
    }

    /// Creates a number from a numerator and denominator. Returns [`None`] if the denominator is
    /// zero.
    pub fn from_ratio(numerator: Integer, denominator: Integer) -> Option<Self> {
        if denominator.cmp0() == Ordering::Equal {
            None
        } else {
            Some(Self(Rational::from((numerator, denominator))))
        }
    }

    /// Parses a decimal literal such as `16`, `3.14` or `.5`. Returns [`None`] if the string is
    /// not made of digits and at most one decimal point.
    pub fn from_decimal_str(s: &str) -> Option<Self> {
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        let digits = format!("{}{}", whole, fraction);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let numerator = digits.parse::<Integer>().ok()?;
        let denominator = Integer::from(Integer::u_pow_u(10, fraction.len() as u32));
        Self::from_ratio(numerator, denominator)
    }

    /// Returns true if this number is an integer.
    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// Returns true if this number is zero.
    pub fn is_zero(&self) -> bool {
        self.0.cmp0() == Ordering::Equal
    }

    /// Returns true if this number is one.
    pub fn is_one(&self) -> bool {
        self.0 == 1
    }

    /// Returns true if this number is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0.cmp0() == Ordering::Less
    }

    /// Returns the sign of the number as [`Ordering`] relative to zero.
    pub fn signum(&self) -> Ordering {
        self.0.cmp0()
    }

    /// Returns the absolute value of the number.
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the numerator of the number in lowest terms. Its sign is the sign of the number.
    pub fn numer(&self) -> &Integer {
        self.0.numer()
    }

    /// Returns the denominator of the number in lowest terms. It is always positive.
    pub fn denom(&self) -> &Integer {
        self.0.denom()
    }

    /// Returns the value as an integer, if it is one.
    pub fn to_integer(&self) -> Option<Integer> {
        self.is_integer().then(|| self.0.numer().clone())
    }

    /// Divides two numbers, returning [`None`] when dividing by zero.
    pub fn checked_div(&self, rhs: &Self) -> Option<Self> {
        if rhs.is_zero() {
            None
        } else {
            Some(Self(Rational::from(&self.0 / &rhs.0)))
        }
    }

    /// Returns the remainder of integer division, truncating towards zero. Returns [`None`] if
    /// either number is not an integer, or the divisor is zero.
    pub fn checked_rem(&self, rhs: &Self) -> Option<Self> {
        let (lhs, rhs) = (self.to_integer()?, rhs.to_integer()?);
        if rhs.cmp0() == Ordering::Equal {
            return None;
        }
        Some(Self::from(Integer::from(&lhs % &rhs)))
    }

    /// Returns the greatest common divisor of the absolute values of two integers. Returns
    /// [`None`] if either number is not an integer.
    pub fn gcd(&self, rhs: &Self) -> Option<Self> {
        let (lhs, rhs) = (self.to_integer()?, rhs.to_integer()?);
        Some(Self::from(lhs.gcd(&rhs)))
    }

    /// Raises this number to an integer power.
    ///
    /// Returns [`None`] if the exponent is not an integer, its magnitude exceeds
    /// [`MAX_EXPONENT`], the result would need more than [`MAX_POWER_BITS`] bits, or the base is
    /// zero and the exponent negative.
    pub fn checked_pow(&self, exponent: &Self) -> Option<Self> {
        let exponent = exponent.to_integer()?;
        let magnitude = Integer::from(exponent.abs_ref()).to_u32()?;
        if magnitude > MAX_EXPONENT {
            return None;
        }

        let bits = u64::from(self.0.numer().significant_bits())
            .max(u64::from(self.0.denom().significant_bits()));
        if bits * u64::from(magnitude) > MAX_POWER_BITS {
            return None;
        }

        let result = self.0.clone().pow(magnitude);
        if exponent.cmp0() == Ordering::Less {
            if result.cmp0() == Ordering::Equal {
                return None;
            }
            Some(Self(result.recip()))
        } else {
            Some(Self(result))
        }
    }

    /// If the number has a finite decimal expansion, returns its absolute value scaled to an
    /// integer, along with the number of digits after the decimal point.
    fn decimal_expansion(&self) -> Option<(Integer, u32)> {
        let denom = self.0.denom();
        let (rest, twos) = denom.clone().remove_factor(&Integer::from(2));
        let (rest, fives) = rest.remove_factor(&Integer::from(5));
        if rest != 1 {
            return None;
        }

        let places = twos.max(fives);
        let scale = Integer::from(Integer::u_pow_u(10, places));
        let scaled = Integer::from(self.0.numer().abs_ref()) * scale / denom;
        Some((scaled, places))
    }

    /// Returns true if the number can be written exactly with finitely many decimal digits.
    pub fn is_terminating(&self) -> bool {
        self.is_integer() || self.decimal_expansion().is_some()
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self(Rational::from(n))
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self(Rational::from(n))
    }
}

impl Add for &Number {
    type Output = Number;

    fn add(self, rhs: Self) -> Number {
        Number(Rational::from(&self.0 + &rhs.0))
    }
}

impl Sub for &Number {
    type Output = Number;

    fn sub(self, rhs: Self) -> Number {
        Number(Rational::from(&self.0 - &rhs.0))
    }
}

impl Mul for &Number {
    type Output = Number;

    fn mul(self, rhs: Self) -> Number {
        Number(Rational::from(&self.0 * &rhs.0))
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        Number(-self.0)
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        Number(Rational::from(-&self.0))
    }
}

/// Integers print as-is, terminating decimals print in decimal notation, and anything else
/// prints as `p/q`.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_integer() {
            return write!(f, "{}", self.0.numer());
        }

        let Some((scaled, places)) = self.decimal_expansion() else {
            return write!(f, "{}/{}", self.0.numer(), self.0.denom());
        };

        let places = places as usize;
        let mut digits = scaled.to_string();
        if digits.len() <= places {
            digits = format!("{}{}", "0".repeat(places + 1 - digits.len()), digits);
        }
        let (whole, fraction) = digits.split_at(digits.len() - places);

        if self.is_negative() {
            write!(f, "-")?;
        }
        write!(f, "{}.{}", whole, fraction)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn num(s: &str) -> Number {
        Number::from_decimal_str(s).unwrap()
    }

    #[test]
    fn parse_decimals_exactly() {
        assert_eq!(num("3.14"), Number::from_ratio(Integer::from(157), Integer::from(50)).unwrap());
        assert_eq!(num(".5"), Number::from_ratio(Integer::from(1), Integer::from(2)).unwrap());
        assert_eq!(num("16"), Number::from(16));
        assert_eq!(Number::from_decimal_str("1.2.3"), None);
        assert_eq!(Number::from_decimal_str("."), None);
    }

    #[test]
    fn display() {
        assert_eq!(Number::from(-42).to_string(), "-42");
        assert_eq!(num("3.14").to_string(), "3.14");
        assert_eq!(num("0.05").to_string(), "0.05");
        assert_eq!((-&num("0.5")).to_string(), "-0.5");
        assert_eq!(
            Number::from_ratio(Integer::from(-1), Integer::from(3)).unwrap().to_string(),
            "-1/3",
        );
    }

    #[test]
    fn integer_operations() {
        let (a, b) = (Number::from(12), Number::from(-18));
        assert_eq!(a.gcd(&b), Some(Number::from(6)));
        assert_eq!(a.checked_rem(&Number::from(5)), Some(Number::from(2)));
        assert_eq!(a.checked_rem(&Number::zero()), None);
        assert_eq!(num("1.5").gcd(&a), None);
    }

    #[test]
    fn powers() {
        let two = Number::from(2);
        assert_eq!(two.checked_pow(&Number::from(10)), Some(Number::from(1024)));
        assert_eq!(two.checked_pow(&Number::from(-2)), Some(num("0.25")));
        assert_eq!(Number::zero().checked_pow(&Number::from(-1)), None);
        assert_eq!(two.checked_pow(&num("0.5")), None);
        assert_eq!(two.checked_pow(&Number::from(100_000)), None);
    }

    #[test]
    fn power_size_is_bounded() {
        let big = Number::from(2).checked_pow(&Number::from(1024)).unwrap();
        assert_eq!(big.checked_pow(&Number::from(1024)), None);
        assert_eq!(big.checked_pow(&Number::from(-1024)), None);
        assert!(big.checked_pow(&Number::from(2)).is_some());

        // 1/2^1024 has a large denominator
        let small = Number::one().checked_div(&big).unwrap();
        assert_eq!(small.checked_pow(&Number::from(1024)), None);
    }

    #[test]
    fn division() {
        assert_eq!(Number::from(1).checked_div(&Number::zero()), None);
        assert_eq!(Number::from(3).checked_div(&Number::from(4)), Some(num("0.75")));
    }
}
