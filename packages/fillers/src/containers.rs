use std::collections::BTreeMap;

use typefill_shapes::TypeShape;
use typefill_values::{Value, ValueKind};

use crate::{AnnotatedFiller, BindContext, Filler, FillerError, ShapeBehavior, ShapedFiller};

/// List checking and element refinement.
///
/// The check looks at the origin kind only; elements are filled during
/// refinement, each through a full staged run of the owned element
/// filler.
#[derive(Debug)]
pub struct ListCheck {
    element: Box<ShapedFiller>,
}

/// A filler for one list field.
pub type ListFiller = AnnotatedFiller<ListCheck>;

impl AnnotatedFiller<ListCheck> {
    #[must_use]
    pub fn of(element: ShapedFiller) -> Self {
        let origin = TypeShape::List(Box::new(element.origin().clone()));
        Self::new(
            origin,
            ListCheck {
                element: Box::new(element),
            },
        )
    }
}

impl ShapeBehavior for ListCheck {
    fn type_check(&self, _origin: &TypeShape, value: &Value) -> bool {
        value.kind() == ValueKind::List
    }

    fn type_check_strict(&self, _origin: &TypeShape, value: &Value) -> bool {
        value.kind() == ValueKind::List
    }

    fn refine(&self, value: Value) -> Result<Value, FillerError> {
        match value {
            Value::List(values) => {
                let mut filled = Vec::with_capacity(values.len());
                for value in values {
                    filled.push(self.element.fill(value).finish()?);
                }
                Ok(Value::List(filled))
            }
            value => Ok(value),
        }
    }

    fn bind_children(&mut self, ctx: &BindContext<'_>) -> Result<(), FillerError> {
        self.element.bind(ctx)
    }
}

/// Map checking and entry-value refinement. Keys pass through untouched.
#[derive(Debug)]
pub struct MapCheck {
    values: Box<ShapedFiller>,
}

/// A filler for one string-keyed map field.
pub type MapFiller = AnnotatedFiller<MapCheck>;

impl AnnotatedFiller<MapCheck> {
    #[must_use]
    pub fn of(values: ShapedFiller) -> Self {
        let origin = TypeShape::Map(Box::new(values.origin().clone()));
        Self::new(
            origin,
            MapCheck {
                values: Box::new(values),
            },
        )
    }
}

impl ShapeBehavior for MapCheck {
    fn type_check(&self, _origin: &TypeShape, value: &Value) -> bool {
        value.kind() == ValueKind::Map
    }

    fn type_check_strict(&self, _origin: &TypeShape, value: &Value) -> bool {
        value.kind() == ValueKind::Map
    }

    fn refine(&self, value: Value) -> Result<Value, FillerError> {
        match value {
            Value::Map(entries) => {
                let filled = entries
                    .into_iter()
                    .map(|(key, value)| Ok((key, self.values.fill(value).finish()?)))
                    .collect::<Result<BTreeMap<_, _>, FillerError>>()?;
                Ok(Value::Map(filled))
            }
            value => Ok(value),
        }
    }

    fn bind_children(&mut self, ctx: &BindContext<'_>) -> Result<(), FillerError> {
        self.values.bind(ctx)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ScalarFiller, TypeCheckStyle, ValidationError, ValidationToken, coercers, validators,
    };

    fn ctx() -> BindContext<'static> {
        BindContext::new("Owner", "field")
    }

    fn int_element() -> ShapedFiller {
        ShapedFiller::Scalar(
            ScalarFiller::of(TypeShape::Int)
                .with_style(TypeCheckStyle::Check)
                .with_coercer(coercers::parse_int()),
        )
    }

    #[test_log::test]
    fn list_refines_each_element_through_the_element_filler() {
        let mut filler = ListFiller::of(int_element()).with_style(TypeCheckStyle::Check);
        filler.bind(&ctx()).unwrap();

        let filled = filler
            .fill(Value::List(vec![Value::Int(1), Value::Str("2".into())]))
            .finish();

        assert_eq!(filled, Ok(Value::List(vec![Value::Int(1), Value::Int(2)])));
    }

    #[test_log::test]
    fn element_failures_propagate_unchanged() {
        let element = ShapedFiller::Scalar(
            ScalarFiller::of(TypeShape::Int)
                .with_style(TypeCheckStyle::Check)
                .with_validator(validators::int_range(0, 10)),
        );
        let mut filler = ListFiller::of(element).with_style(TypeCheckStyle::Check);
        filler.bind(&ctx()).unwrap();

        assert_eq!(
            filler
                .fill(Value::List(vec![Value::Int(1), Value::Int(50)]))
                .finish(),
            Err(FillerError::Validation(ValidationError::Rejected(
                "50 is outside 0..=10".into(),
            ))),
        );
    }

    #[test_log::test]
    fn non_list_input_is_a_type_mismatch() {
        let mut filler = ListFiller::of(int_element()).with_style(TypeCheckStyle::Check);
        filler.bind(&ctx()).unwrap();

        assert_eq!(
            filler.fill(Value::Int(5)).finish(),
            Err(FillerError::TypeMismatch {
                kind: ValueKind::Int,
            }),
        );
    }

    #[test_log::test]
    fn coerced_lists_are_still_refined() {
        let mut filler = ListFiller::of(int_element())
            .with_style(TypeCheckStyle::Check)
            .with_coercer(coercers::wrap_singleton());
        filler.bind(&ctx()).unwrap();

        assert_eq!(
            filler.fill(Value::Str("5".into())).finish(),
            Ok(Value::List(vec![Value::Int(5)])),
        );
    }

    #[test_log::test]
    fn hollow_lists_skip_refinement_entirely() {
        let mut filler = ListFiller::of(int_element()).with_style(TypeCheckStyle::Hollow);
        filler.bind(&ctx()).unwrap();

        let value = Value::List(vec![Value::Str("unparsed".into())]);

        assert_eq!(filler.fill(value.clone()).finish(), Ok(value));
    }

    #[test_log::test]
    fn nested_lists_refine_recursively() {
        let inner = ShapedFiller::List(ListFiller::of(int_element()).with_style(TypeCheckStyle::Check));
        let mut filler = ListFiller::of(inner).with_style(TypeCheckStyle::Check);
        filler.bind(&ctx()).unwrap();

        assert_eq!(
            filler
                .fill(Value::List(vec![Value::List(vec![Value::Str("7".into())])]))
                .finish(),
            Ok(Value::List(vec![Value::List(vec![Value::Int(7)])])),
        );
    }

    #[test_log::test]
    fn map_refines_entry_values_and_keeps_keys() {
        let mut filler = MapFiller::of(int_element()).with_style(TypeCheckStyle::Check);
        filler.bind(&ctx()).unwrap();

        let mut entries = BTreeMap::new();
        entries.insert("a".to_string(), Value::Str("1".into()));
        entries.insert("b".to_string(), Value::Int(2));

        let mut expected = BTreeMap::new();
        expected.insert("a".to_string(), Value::Int(1));
        expected.insert("b".to_string(), Value::Int(2));

        assert_eq!(
            filler.fill(Value::Map(entries)).finish(),
            Ok(Value::Map(expected)),
        );
    }

    #[test_log::test]
    fn child_bind_failures_fail_the_container_bind() {
        let element = ShapedFiller::Scalar(ScalarFiller::of(TypeShape::Int));
        let mut filler = ListFiller::of(element).with_style(TypeCheckStyle::Check);

        assert_eq!(
            filler.bind(&ctx()),
            Err(FillerError::Configuration(
                crate::ConfigurationError::Unconfigured,
            )),
        );
    }

    #[test_log::test]
    fn origin_is_derived_from_the_element_shape() {
        let filler = ListFiller::of(int_element());
        assert_eq!(filler.origin().to_string(), "list<int>");

        let filler = MapFiller::of(int_element());
        assert_eq!(filler.origin().to_string(), "map<int>");
    }

    #[test_log::test]
    fn validators_see_the_refined_list() {
        let mut filler = ListFiller::of(int_element())
            .with_style(TypeCheckStyle::Check)
            .with_validator(ValidationToken::func(|value| match &value {
                Value::List(values) if values.len() == 2 => Ok(value),
                _ => Err(ValidationError::Rejected("expected exactly two items".into())),
            }));
        filler.bind(&ctx()).unwrap();

        assert_eq!(
            filler
                .fill(Value::List(vec![Value::Str("1".into()), Value::Str("2".into())]))
                .finish(),
            Ok(Value::List(vec![Value::Int(1), Value::Int(2)])),
        );
    }
}
