//! Normalisation of operand pairs toward a comparable shape.
//!
//! Coercion never fails: operands that cannot be converted are returned as
//! they came in, and the comparison step reports the mismatch.

use stepcheck_types::ComparisonOperator;

use crate::number::Number;
use crate::value::{BoolWords, List, Scalar, TypedValue, parse_bool_word, parse_integer};

/// Align the shapes of `actual` and `expected` for `operator`.
///
/// Outside the membership operators a scalar facing a list is promoted to a
/// singleton list. For membership, a scalar actual facing a list expected is
/// promoted so the subsequence form applies. Scalar pairs are passed through
/// [`coerce_scalars`]. When `textual` is set, text operands keep their
/// textual meaning.
#[must_use]
pub fn coerce(
    actual: TypedValue,
    operator: ComparisonOperator,
    expected: TypedValue,
    textual: bool,
) -> (TypedValue, TypedValue) {
    match (actual, expected) {
        (TypedValue::Scalar(left), TypedValue::Scalar(right)) => {
            let (left, right) = coerce_scalars(left, right, textual);
            (TypedValue::Scalar(left), TypedValue::Scalar(right))
        }
        (TypedValue::Scalar(item), TypedValue::List(list)) => {
            log::trace!("promoting scalar actual {item} to a singleton list");
            (TypedValue::List(List::singleton(item)), TypedValue::List(list))
        }
        (TypedValue::List(list), TypedValue::Scalar(item)) if !operator.is_membership() => {
            log::trace!("promoting scalar expected {item} to a singleton list");
            (TypedValue::List(list), TypedValue::List(List::singleton(item)))
        }
        pair => pair,
    }
}

/// Normalise a scalar pair.
///
/// Numeric-looking text facing a number, or facing other numeric-looking
/// text, is parsed as an integer and then as a decimal. Boolean-looking text
/// (`yes`, `true`, `no`, `false`) facing a boolean, or facing other
/// boolean-looking text, becomes a boolean. Integers facing decimals widen.
///
/// # Examples
///
/// ```
/// use stepcheck::coercion::coerce_scalars;
/// use stepcheck::Scalar;
///
/// let (left, right) = coerce_scalars(Scalar::Integer(5), Scalar::Text("5".into()), false);
/// assert_eq!(left, right);
///
/// let (_, kept) = coerce_scalars(Scalar::Integer(5), Scalar::Text("5".into()), true);
/// assert_eq!(kept, Scalar::Text("5".into()));
/// ```
#[must_use]
pub fn coerce_scalars(left: Scalar, right: Scalar, textual: bool) -> (Scalar, Scalar) {
    match (left, right) {
        (Scalar::Integer(int), Scalar::Decimal(dec)) => {
            (Scalar::Decimal(int.into()), Scalar::Decimal(dec))
        }
        (Scalar::Decimal(dec), Scalar::Integer(int)) => {
            (Scalar::Decimal(dec), Scalar::Decimal(int.into()))
        }
        (left, right) if textual => (left, right),
        (Scalar::Text(text), other) if other.as_number().is_some() => {
            let coerced = numeric(&text).unwrap_or(Scalar::Text(text));
            align_numbers(coerced, other)
        }
        (other, Scalar::Text(text)) if other.as_number().is_some() => {
            let coerced = numeric(&text).unwrap_or(Scalar::Text(text));
            let (right, left) = align_numbers(coerced, other);
            (left, right)
        }
        (Scalar::Text(text), Scalar::Boolean(flag)) => (boolean(text), Scalar::Boolean(flag)),
        (Scalar::Boolean(flag), Scalar::Text(text)) => (Scalar::Boolean(flag), boolean(text)),
        (Scalar::Text(left), Scalar::Text(right)) => text_pair(left, right),
        pair => pair,
    }
}

fn text_pair(left: String, right: String) -> (Scalar, Scalar) {
    if let (Some(l), Some(r)) = (numeric(&left), numeric(&right)) {
        log::trace!("reading text pair '{left}'/'{right}' as numbers");
        return align_numbers(l, r);
    }
    if let (Some(l), Some(r)) = (
        parse_bool_word(&left, BoolWords::Data),
        parse_bool_word(&right, BoolWords::Data),
    ) {
        log::trace!("reading text pair '{left}'/'{right}' as booleans");
        return (Scalar::Boolean(l), Scalar::Boolean(r));
    }
    (Scalar::Text(left), Scalar::Text(right))
}

fn numeric(text: &str) -> Option<Scalar> {
    parse_integer(text)
        .map(Scalar::Integer)
        .or_else(|| Number::parse(text).map(Scalar::Decimal))
}

fn boolean(text: String) -> Scalar {
    parse_bool_word(&text, BoolWords::Data).map_or(Scalar::Text(text), Scalar::Boolean)
}

fn align_numbers(left: Scalar, right: Scalar) -> (Scalar, Scalar) {
    match (left, right) {
        (Scalar::Integer(int), Scalar::Decimal(dec)) => {
            (Scalar::Decimal(int.into()), Scalar::Decimal(dec))
        }
        (Scalar::Decimal(dec), Scalar::Integer(int)) => {
            (Scalar::Decimal(dec), Scalar::Decimal(int.into()))
        }
        pair => pair,
    }
}
