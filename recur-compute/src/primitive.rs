//! Functions to construct [`Rational`]s from various types.

use rug::{Integer, Rational};

/// Creates a [`Rational`] with the given value.
pub fn int<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates a [`Rational`] from a numerator and a denominator. The denominator must not be zero.
pub fn frac(numer: i64, denom: i64) -> Rational {
    Rational::from((numer, denom))
}

/// Creates an [`Integer`] from a string slice of decimal digits. Characters that are not digits
/// are skipped, since the tokenizer only ever produces digits for integer literals.
pub fn int_from_str(s: &str) -> Integer {
    s.bytes()
        .filter(u8::is_ascii_digit)
        .fold(Integer::new(), |acc, digit| acc * 10 + u32::from(digit - b'0'))
}

/// Returns the value of the rational number as an [`i64`], if it is an integer that fits.
pub fn as_i64(n: &Rational) -> Option<i64> {
    if *n.denom() == 1 {
        n.numer().to_i64()
    } else {
        None
    }
}

/// Raises the rational number to an integer power. Returns [`None`] when raising zero to a
/// negative power.
pub fn rational_pow(base: &Rational, exp: i64) -> Option<Rational> {
    if exp < 0 && *base == 0 {
        return None;
    }

    let mut result = int(1);
    for _ in 0..exp.unsigned_abs() {
        result *= base;
    }

    if exp < 0 {
        Some(result.recip())
    } else {
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_digits() {
        assert_eq!(int_from_str("1072"), Integer::from(1072));
        assert_eq!(int_from_str("0"), Integer::new());
    }

    #[test]
    fn powers() {
        assert_eq!(rational_pow(&frac(2, 3), 2), Some(frac(4, 9)));
        assert_eq!(rational_pow(&int(2), -3), Some(frac(1, 8)));
        assert_eq!(rational_pow(&int(0), -1), None);
        assert_eq!(as_i64(&frac(6, 3)), Some(2));
        assert_eq!(as_i64(&frac(1, 2)), None);
    }
}
