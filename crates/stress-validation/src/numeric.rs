use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Value, json};
use stress_core::{AppError, Details};

/// Outcome of loosely reading an integer out of a JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Coerced {
    Missing,
    NotANumber,
    Integer(i64),
}

/// Read an integer from a JSON number or a signed decimal string
///
/// Floats are truncated toward zero. Values beyond the `i64` range
/// saturate so they still fail the range check with a sensible
/// `received` value.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn coerce(value: Option<&Value>) -> Coerced {
    fn integer_shape() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^[+-]?[0-9]+$").expect("must be valid regex"))
    }

    match value {
        None | Some(Value::Null) => Coerced::Missing,
        Some(Value::String(s)) if s.is_empty() => Coerced::Missing,
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Coerced::Integer(i)
            } else if let Some(u) = n.as_u64() {
                Coerced::Integer(i64::try_from(u).unwrap_or(i64::MAX))
            } else {
                // `as` saturates for out-of-range floats
                n.as_f64()
                    .map_or(Coerced::NotANumber, |f| Coerced::Integer(f.trunc() as i64))
            }
        }
        Some(Value::String(s)) if integer_shape().is_match(s) => {
            let saturated = if s.starts_with('-') { i64::MIN } else { i64::MAX };
            Coerced::Integer(s.parse().unwrap_or(saturated))
        }
        Some(_) => Coerced::NotANumber,
    }
}

/// Validate a required integer within `[min, max]`
///
/// # Errors
///
/// Fails when the value is absent or empty, is not numeric, or lies
/// outside the inclusive range. Range failures carry
/// `{field, min, max, received}` details.
pub fn validate_integer(value: Option<&Value>, field: &str, min: i64, max: i64) -> Result<i64, AppError> {
    let number = match coerce(value) {
        Coerced::Missing => return Err(AppError::validation(format!("{field} is required"))),
        Coerced::NotANumber => return Err(AppError::validation(format!("{field} must be a number"))),
        Coerced::Integer(number) => number,
    };

    if number < min || number > max {
        let mut details = Details::new();
        details.insert("field".to_owned(), json!(field));
        details.insert("min".to_owned(), json!(min));
        details.insert("max".to_owned(), json!(max));
        details.insert("received".to_owned(), json!(number));

        return Err(AppError::validation(format!("{field} must be between {min} and {max}")).with_details(details));
    }

    Ok(number)
}

/// Like [`validate_integer`], but an absent or empty value yields `default`
///
/// # Errors
///
/// Same as [`validate_integer`] once a value is present.
pub fn validate_optional_integer(
    value: Option<&Value>,
    field: &str,
    min: i64,
    max: i64,
    default: i64,
) -> Result<i64, AppError> {
    if coerce(value) == Coerced::Missing {
        return Ok(default);
    }

    validate_integer(value, field, min, max)
}

/// Validate against unsigned bounds taken from configuration
pub(crate) fn validate_bounded(value: Option<&Value>, field: &str, min: u64, max: u64) -> Result<u64, AppError> {
    let min = i64::try_from(min).unwrap_or(i64::MAX);
    let max = i64::try_from(max).unwrap_or(i64::MAX);

    // The lower bound is never negative, so the magnitude is the value
    validate_integer(value, field, min, max).map(i64::unsigned_abs)
}
