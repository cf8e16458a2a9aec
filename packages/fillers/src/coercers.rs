//! Builtin coercion tokens.
//!
//! Each constructor returns a ready-made [`CoercionToken`] for a common
//! conversion. Builtins report refusals as
//! [`CoercionError::Unsupported`] so a scan can skip to the next
//! candidate; hand-written closures are free to use
//! [`CoercionError::Failed`] instead.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use typefill_values::Value;

use crate::{Coercer, CoercionError, CoercionToken};

/// Parses a string into an integer.
#[must_use]
pub fn parse_int() -> CoercionToken {
    CoercionToken::Func(int_parser())
}

/// Parses a string into a float.
#[must_use]
pub fn parse_float() -> CoercionToken {
    CoercionToken::Func(float_parser())
}

/// Parses a string into a bool. Accepts `true`/`false` and `1`/`0`,
/// case-insensitively.
#[must_use]
pub fn parse_bool() -> CoercionToken {
    CoercionToken::Func(bool_parser())
}

/// Parses a string into a datetime. Accepts a bare year, a `%Y-%m-%d`
/// date, and ISO 8601 datetimes with or without fractional seconds, a
/// trailing `Z`, or a `+00:00` offset.
#[must_use]
pub fn parse_date_time() -> CoercionToken {
    CoercionToken::Func(date_time_parser())
}

/// Widens an integer (or bool) to a float.
#[must_use]
pub fn int_to_float() -> CoercionToken {
    CoercionToken::func(|value| {
        #[allow(clippy::cast_precision_loss)]
        let widened = value.as_i64().map(|value| Value::Float(value as f64));
        widened.ok_or(CoercionError::Unsupported {
            from: value.kind(),
            to: "float",
        })
    })
}

/// Narrows a float to an integer only when nothing is lost.
#[must_use]
pub fn float_to_int_lossless() -> CoercionToken {
    CoercionToken::func(|value| match value {
        Value::Float(raw) => {
            #[allow(clippy::cast_precision_loss)]
            let in_range = *raw >= i64::MIN as f64 && *raw <= i64::MAX as f64;
            if raw.is_finite() && raw.fract() == 0.0 && in_range {
                #[allow(clippy::cast_possible_truncation)]
                let value = *raw as i64;
                Ok(Value::Int(value))
            } else {
                Err(CoercionError::Failed(format!(
                    "`{raw}` does not convert losslessly to int"
                )))
            }
        }
        value => Err(CoercionError::Unsupported {
            from: value.kind(),
            to: "int",
        }),
    })
}

/// Converts a bool to `0` or `1`.
#[must_use]
pub fn bool_to_int() -> CoercionToken {
    CoercionToken::func(|value| {
        value
            .as_bool()
            .map(|value| Value::Int(i64::from(value)))
            .ok_or(CoercionError::Unsupported {
                from: value.kind(),
                to: "int",
            })
    })
}

/// Renders a scalar as a string. Datetimes render as ISO 8601.
#[must_use]
pub fn to_str() -> CoercionToken {
    CoercionToken::Func(stringifier())
}

/// Wraps any value into a one-element list.
#[must_use]
pub fn wrap_singleton() -> CoercionToken {
    CoercionToken::func(|value| Ok(Value::List(vec![value.clone()])))
}

pub(crate) fn int_parser() -> Coercer {
    Box::new(|value| match value {
        Value::Str(raw) => raw.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            CoercionError::Failed(format!("invalid integer literal `{raw}`"))
        }),
        value => Err(CoercionError::Unsupported {
            from: value.kind(),
            to: "int",
        }),
    })
}

pub(crate) fn float_parser() -> Coercer {
    Box::new(|value| match value {
        Value::Str(raw) => raw.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            CoercionError::Failed(format!("invalid float literal `{raw}`"))
        }),
        value => Err(CoercionError::Unsupported {
            from: value.kind(),
            to: "float",
        }),
    })
}

pub(crate) fn bool_parser() -> Coercer {
    Box::new(|value| match value {
        Value::Str(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(CoercionError::Failed(format!("invalid bool literal `{raw}`"))),
        },
        value => Err(CoercionError::Unsupported {
            from: value.kind(),
            to: "bool",
        }),
    })
}

pub(crate) fn date_time_parser() -> Coercer {
    Box::new(|value| match value {
        Value::Str(raw) => date_time_from_str(raw.trim())
            .map(Value::DateTime)
            .map_err(|error| {
                CoercionError::Failed(format!("invalid datetime literal `{raw}`: {error}"))
            }),
        value => Err(CoercionError::Unsupported {
            from: value.kind(),
            to: "datetime",
        }),
    })
}

pub(crate) fn stringifier() -> Coercer {
    Box::new(|value| match value {
        Value::Str(raw) => Ok(Value::Str(raw.clone())),
        Value::Bool(raw) => Ok(Value::Str(raw.to_string())),
        Value::Int(raw) => Ok(Value::Str(raw.to_string())),
        Value::Float(raw) => Ok(Value::Str(raw.to_string())),
        Value::DateTime(raw) => Ok(Value::Str(
            raw.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        )),
        value => Err(CoercionError::Unsupported {
            from: value.kind(),
            to: "str",
        }),
    })
}

fn date_time_from_str(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    if value.len() <= 4 {
        if let Ok(year) = value.parse::<u16>() {
            if let Some(date) = NaiveDate::default().with_year(i32::from(year)) {
                return Ok(date.into());
            }
        }
    }
    if value.len() == 10 {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .inspect_err(|&error| log::trace!("failed to parse date `{value}`: {error:?}"))
            .map(Into::into);
    }
    if value.ends_with('Z') {
        return NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ").inspect_err(|&error| {
            log::trace!("failed to parse zulu datetime `{value}`: {error:?}");
        });
    }
    if value.ends_with("+00:00") {
        return NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z").inspect_err(
            |&error| {
                log::trace!("failed to parse offset datetime `{value}`: {error:?}");
            },
        );
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").inspect_err(|&error| {
        log::trace!("failed to parse datetime `{value}`: {error:?}");
    })
}
