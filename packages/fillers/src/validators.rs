//! Builtin validation tokens.
//!
//! Each constructor returns a ready-made [`ValidationToken`]. Validators
//! receive an already type-conformant value and either pass it through,
//! transform it, or reject it with [`ValidationError::Rejected`].

use typefill_values::Value;

use crate::{ValidationError, ValidationToken};

/// Requires an integer within `min..=max`.
#[must_use]
pub fn int_range(min: i64, max: i64) -> ValidationToken {
    ValidationToken::func(move |value| match value.as_i64() {
        Some(raw) if (min..=max).contains(&raw) => Ok(value),
        Some(raw) => Err(ValidationError::Rejected(format!(
            "{raw} is outside {min}..={max}"
        ))),
        None => Err(ValidationError::Rejected(format!(
            "expected an integer, got `{}`",
            value.kind()
        ))),
    })
}

/// Requires a string, list, or map of at least `min` elements.
#[must_use]
pub fn min_len(min: usize) -> ValidationToken {
    ValidationToken::func(move |value| match length_of(&value) {
        Some(len) if len >= min => Ok(value),
        Some(len) => Err(ValidationError::Rejected(format!(
            "length {len} is below the minimum {min}"
        ))),
        None => Err(ValidationError::Rejected(format!(
            "`{}` has no length",
            value.kind()
        ))),
    })
}

/// Requires a string, list, or map of at most `max` elements.
#[must_use]
pub fn max_len(max: usize) -> ValidationToken {
    ValidationToken::func(move |value| match length_of(&value) {
        Some(len) if len <= max => Ok(value),
        Some(len) => Err(ValidationError::Rejected(format!(
            "length {len} is above the maximum {max}"
        ))),
        None => Err(ValidationError::Rejected(format!(
            "`{}` has no length",
            value.kind()
        ))),
    })
}

/// Requires a non-empty string, list, or map.
#[must_use]
pub fn non_empty() -> ValidationToken {
    ValidationToken::func(|value| match length_of(&value) {
        Some(0) => Err(ValidationError::Rejected("value is empty".into())),
        Some(_) => Ok(value),
        None => Err(ValidationError::Rejected(format!(
            "`{}` has no length",
            value.kind()
        ))),
    })
}

/// Rejects non-finite floats. Values of other kinds pass through.
#[must_use]
pub fn finite() -> ValidationToken {
    ValidationToken::func(|value| match value {
        Value::Float(raw) if !raw.is_finite() => Err(ValidationError::Rejected(format!(
            "`{raw}` is not finite"
        ))),
        value => Ok(value),
    })
}

/// Requires the value to equal one of `options`.
#[must_use]
pub fn one_of(options: Vec<Value>) -> ValidationToken {
    ValidationToken::func(move |value| {
        if options.contains(&value) {
            Ok(value)
        } else {
            Err(ValidationError::Rejected(
                "value is not one of the permitted options".into(),
            ))
        }
    })
}

/// Trims surrounding whitespace from strings. Values of other kinds
/// pass through.
#[must_use]
pub fn trimmed() -> ValidationToken {
    ValidationToken::func(|value| match value {
        Value::Str(raw) => Ok(Value::Str(raw.trim().to_string())),
        value => Ok(value),
    })
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Str(raw) => Some(raw.chars().count()),
        Value::List(values) => Some(values.len()),
        Value::Map(entries) => Some(entries.len()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn apply(token: ValidationToken, value: Value) -> Result<Value, ValidationError> {
        token.into_validator().unwrap()(value)
    }

    #[test_log::test]
    fn int_range_is_inclusive_on_both_ends() {
        assert_eq!(apply(int_range(0, 10), Value::Int(0)), Ok(Value::Int(0)));
        assert_eq!(apply(int_range(0, 10), Value::Int(10)), Ok(Value::Int(10)));
        assert_eq!(
            apply(int_range(0, 10), Value::Int(-5)),
            Err(ValidationError::Rejected("-5 is outside 0..=10".into())),
        );
    }

    #[test_log::test]
    fn int_range_rejects_non_integers() {
        assert_eq!(
            apply(int_range(0, 10), Value::Str("5".into())),
            Err(ValidationError::Rejected("expected an integer, got `str`".into())),
        );
    }

    #[test_log::test]
    fn length_bounds_cover_strings_lists_and_maps() {
        assert_eq!(
            apply(min_len(2), Value::Str("ab".into())),
            Ok(Value::Str("ab".into())),
        );
        assert!(apply(min_len(2), Value::List(vec![Value::Int(1)])).is_err());
        assert!(apply(max_len(1), Value::Str("ab".into())).is_err());
        assert!(apply(min_len(1), Value::Int(5)).is_err());
    }

    #[test_log::test]
    fn non_empty_rejects_only_empties() {
        assert!(apply(non_empty(), Value::Str(String::new())).is_err());
        assert!(apply(non_empty(), Value::List(vec![])).is_err());
        assert_eq!(
            apply(non_empty(), Value::Str("x".into())),
            Ok(Value::Str("x".into())),
        );
    }

    #[test_log::test]
    fn finite_rejects_nan_and_infinities() {
        assert_eq!(apply(finite(), Value::Float(5.5)), Ok(Value::Float(5.5)));
        assert!(apply(finite(), Value::Float(f64::NAN)).is_err());
        assert!(apply(finite(), Value::Float(f64::NEG_INFINITY)).is_err());
        assert_eq!(apply(finite(), Value::Int(5)), Ok(Value::Int(5)));
    }

    #[test_log::test]
    fn one_of_accepts_only_listed_values() {
        let options = vec![Value::Str("a".into()), Value::Str("b".into())];

        assert_eq!(
            apply(one_of(options.clone()), Value::Str("a".into())),
            Ok(Value::Str("a".into())),
        );
        assert!(apply(one_of(options), Value::Str("c".into())).is_err());
    }

    #[test_log::test]
    fn trimmed_strips_surrounding_whitespace() {
        assert_eq!(
            apply(trimmed(), Value::Str("  x  ".into())),
            Ok(Value::Str("x".into())),
        );
        assert_eq!(apply(trimmed(), Value::Int(5)), Ok(Value::Int(5)));
    }
}
