//! Numbers carried by decimal-typed values.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// A decimal-typed number.
///
/// Values that `rust_decimal` can hold are kept exact. Magnitudes beyond its
/// range (about ±7.9e28), and fractions finer than its 28-digit scale, are
/// kept as finite binary floating point so they still order as numbers.
///
/// # Examples
///
/// ```
/// use stepcheck::Number;
///
/// let huge = Number::parse("1e30").unwrap();
/// let small = Number::parse("5").unwrap();
/// assert!(huge > small);
/// assert!(!huge.is_exact());
/// assert_eq!(Number::parse("2.50"), Number::parse("2.5"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Number(Repr);

#[derive(Debug, Clone, Copy)]
enum Repr {
    Exact(Decimal),
    // Always finite, and only for values `Decimal` cannot represent.
    Approximate(f64),
}

impl Number {
    /// Parse decimal-looking text, accepting scientific notation.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(exact) =
            Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed))
        {
            return Some(Self(Repr::Exact(exact)));
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| Self(Repr::Approximate(value)))
    }

    /// Returns `true` when the value is held as an exact decimal.
    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(self.0, Repr::Exact(_))
    }

    /// Exact decimal form, if the value has one.
    #[must_use]
    pub const fn as_exact(self) -> Option<Decimal> {
        match self.0 {
            Repr::Exact(value) => Some(value),
            Repr::Approximate(_) => None,
        }
    }

    /// Integer value, when the number is whole and fits in an `i64`.
    #[must_use]
    pub fn to_i64(self) -> Option<i64> {
        let exact = self.as_exact()?;
        if exact.fract().is_zero() {
            exact.to_i64()
        } else {
            None
        }
    }

    fn to_f64(self) -> f64 {
        match self.0 {
            Repr::Exact(value) => value.to_f64().unwrap_or_default(),
            Repr::Approximate(value) => value,
        }
    }
}

impl From<Decimal> for Number {
    fn from(value: Decimal) -> Self {
        Self(Repr::Exact(value))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self(Repr::Exact(Decimal::from(value)))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Repr::Exact(left), Repr::Exact(right)) => left.cmp(&right),
            _ => self.to_f64().total_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Number {}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Exact(value) => fmt::Display::fmt(&value, f),
            Repr::Approximate(value) => write!(f, "{value:e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn number(text: &str) -> Number {
        Number::parse(text).unwrap_or_else(|| panic!("{text} should parse as a number"))
    }

    #[rstest]
    #[case("2.5", true)]
    #[case(" 1e3 ", true)]
    #[case("1e30", false)]
    #[case("-123456789012345678901234567890123", false)]
    #[case("1e-40", false)]
    fn keeps_exact_form_when_possible(#[case] text: &str, #[case] exact: bool) {
        assert_eq!(number(text).is_exact(), exact);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("inf")]
    #[case("NaN")]
    #[case("1e400")]
    fn rejects_non_finite_and_non_numeric_text(#[case] text: &str) {
        assert_eq!(Number::parse(text), None);
    }

    #[test]
    fn orders_across_representations() {
        assert!(number("1e30") > number("5"));
        assert!(number("-1e29") < number("0"));
        assert!(number("1e30") < number("2e30"));
        assert!(number("1e-40") > number("0"));
        assert!(number("1e-40") < number("0.0000001"));
        assert_eq!(number("1e30"), number("1000000000000000000000000000000"));
    }

    #[test]
    fn whole_exact_values_convert_to_integers() {
        assert_eq!(number("3.0").to_i64(), Some(3));
        assert_eq!(number("3.5").to_i64(), None);
        assert_eq!(number("1e30").to_i64(), None);
    }

    #[test]
    fn renders_wide_values_in_scientific_notation() {
        assert_eq!(number("1e30").to_string(), "1e30");
        assert_eq!(number("2.50").to_string(), "2.50");
    }
}
