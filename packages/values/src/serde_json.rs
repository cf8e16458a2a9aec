//! Bridge between [`Value`] and `serde_json::Value`.
//!
//! JSON is the most common source of unfilled input, so the conversion in
//! is total. The conversion out is total as well, with two narrowings:
//! non-finite floats have no JSON spelling and map to `null`, and
//! `DateTime` serializes as an ISO 8601 string.

use crate::Value;

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(value) => {
                if let Some(value) = value.as_i64() {
                    Self::Int(value)
                } else if let Some(value) = value.as_u64() {
                    #[allow(clippy::cast_precision_loss)]
                    let value = value as f64;
                    Self::Float(value)
                } else {
                    Self::Float(value.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(value) => Self::Str(value),
            serde_json::Value::Array(values) => {
                Self::List(values.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Int(value) => Self::Number(value.into()),
            Value::Float(value) => serde_json::Number::from_f64(value).map_or_else(
                || {
                    log::debug!("non-finite float {value} has no JSON spelling, mapping to null");
                    Self::Null
                },
                Self::Number,
            ),
            Value::Str(value) => Self::String(value),
            Value::DateTime(value) => {
                Self::String(value.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            Value::List(values) => Self::Array(values.into_iter().map(Self::from).collect()),
            Value::Map(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::Value;

    #[test_log::test]
    fn json_scalars_map_to_value_scalars() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!(true)), Value::Bool(true));
        assert_eq!(Value::from(json!(5)), Value::Int(5));
        assert_eq!(Value::from(json!(5.5)), Value::Float(5.5));
        assert_eq!(Value::from(json!("five")), Value::Str("five".into()));
    }

    #[test_log::test]
    fn json_u64_beyond_i64_maps_to_float() {
        let value = Value::from(json!(u64::MAX));
        assert_eq!(value.kind(), crate::ValueKind::Float);
    }

    #[test_log::test]
    fn json_containers_map_recursively() {
        let value = Value::from(json!({"items": [1, "2", null]}));

        let Value::Map(entries) = value else {
            panic!("expected map");
        };
        assert_eq!(
            entries.get("items"),
            Some(&Value::List(vec![
                Value::Int(1),
                Value::Str("2".into()),
                Value::Null,
            ])),
        );
    }

    #[test_log::test]
    fn value_maps_back_to_json() {
        let value = Value::from(vec![Value::Int(1), Value::Str("2".into())]);
        assert_eq!(serde_json::Value::from(value), json!([1, "2"]));
    }

    #[test_log::test]
    fn non_finite_floats_map_to_json_null() {
        assert_eq!(serde_json::Value::from(Value::Float(f64::NAN)), json!(null));
        assert_eq!(
            serde_json::Value::from(Value::Float(f64::INFINITY)),
            json!(null),
        );
    }

    #[test_log::test]
    fn date_time_maps_to_iso_8601_string() {
        let date_time = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();

        assert_eq!(
            serde_json::Value::from(Value::DateTime(date_time)),
            json!("2024-03-01T12:30:00"),
        );
    }
}
