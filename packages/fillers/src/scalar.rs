use typefill_shapes::TypeShape;
use typefill_values::Value;

use crate::{
    AnnotatedFiller, Coercer, CoercionToken, ConfigurationError, ShapeBehavior, coercers,
};

/// Kind checking for scalar shapes.
///
/// `Any` admits every value under `check` and refuses strict checking.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarCheck;

/// A filler for one scalar (or `Any`) field.
pub type ScalarFiller = AnnotatedFiller<ScalarCheck>;

impl AnnotatedFiller<ScalarCheck> {
    #[must_use]
    pub fn of(shape: TypeShape) -> Self {
        Self::new(shape, ScalarCheck)
    }
}

impl ShapeBehavior for ScalarCheck {
    fn type_check(&self, origin: &TypeShape, value: &Value) -> bool {
        origin
            .expected_kind()
            .is_none_or(|kind| value.kind().is_subkind_of(kind))
    }

    fn type_check_strict(&self, origin: &TypeShape, value: &Value) -> bool {
        origin.expected_kind() == Some(value.kind())
    }

    fn strict_checkable(&self, origin: &TypeShape) -> bool {
        origin.expected_kind().is_some()
    }

    /// Resolves the `"parse"` registry name to the shape's string
    /// parser before falling back to base resolution.
    fn resolve_coercion(
        &self,
        origin: &TypeShape,
        token: CoercionToken,
    ) -> Result<Coercer, ConfigurationError> {
        match token {
            CoercionToken::Registry(name) => match (name.as_str(), registry_parser(origin)) {
                ("parse", Some(parser)) => Ok(parser),
                _ => Err(ConfigurationError::NotInvokable { token: name }),
            },
            token => token.into_coercer(),
        }
    }
}

fn registry_parser(origin: &TypeShape) -> Option<Coercer> {
    match origin {
        TypeShape::Int => Some(coercers::int_parser()),
        TypeShape::Float => Some(coercers::float_parser()),
        TypeShape::Bool => Some(coercers::bool_parser()),
        TypeShape::DateTime => Some(coercers::date_time_parser()),
        TypeShape::Str => Some(coercers::stringifier()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{BindContext, Filler, FillerError, TypeCheckStyle};

    fn bound(filler: ScalarFiller) -> ScalarFiller {
        let mut filler = filler;
        filler.bind(&BindContext::new("Owner", "field")).unwrap();
        filler
    }

    #[test_log::test]
    fn any_admits_every_kind_without_coercion() {
        let filler = bound(ScalarFiller::of(TypeShape::Any).with_style(TypeCheckStyle::Check));

        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Int(5),
            Value::Str("five".into()),
            Value::List(vec![Value::Int(1)]),
        ] {
            assert_eq!(filler.fill(value.clone()).finish(), Ok(value));
        }
    }

    #[test_log::test]
    fn null_shape_admits_only_null() {
        let filler = bound(ScalarFiller::of(TypeShape::Null).with_style(TypeCheckStyle::Check));

        assert_eq!(filler.fill(Value::Null).finish(), Ok(Value::Null));
        assert!(filler.fill(Value::Int(0)).finish().is_err());
    }

    #[test_log::test]
    fn parse_registry_resolves_to_the_shape_parser() {
        let filler = bound(
            ScalarFiller::of(TypeShape::Int)
                .with_style(TypeCheckStyle::Check)
                .with_coercer(CoercionToken::registry("parse")),
        );

        assert_eq!(filler.fill(Value::Str("41".into())).finish(), Ok(Value::Int(41)));
    }

    #[test_log::test]
    fn parse_registry_follows_the_declared_shape() {
        let filler = bound(
            ScalarFiller::of(TypeShape::Bool)
                .with_style(TypeCheckStyle::Check)
                .with_coercer(CoercionToken::registry("parse")),
        );

        assert_eq!(
            filler.fill(Value::Str("true".into())).finish(),
            Ok(Value::Bool(true)),
        );
    }

    #[test_log::test]
    fn unknown_registry_names_fail_bind() {
        let mut filler = ScalarFiller::of(TypeShape::Int)
            .with_style(TypeCheckStyle::Check)
            .with_coercer(CoercionToken::registry("conjure"));

        assert_eq!(
            filler.bind(&BindContext::new("Owner", "field")),
            Err(FillerError::Configuration(
                ConfigurationError::NotInvokable {
                    token: "conjure".into(),
                },
            )),
        );
    }

    #[test_log::test]
    fn parse_registry_has_no_entry_for_any() {
        let mut filler = ScalarFiller::of(TypeShape::Any)
            .with_style(TypeCheckStyle::Check)
            .with_coercer(CoercionToken::registry("parse"));

        assert_eq!(
            filler.bind(&BindContext::new("Owner", "field")),
            Err(FillerError::Configuration(
                ConfigurationError::NotInvokable {
                    token: "parse".into(),
                },
            )),
        );
    }
}
