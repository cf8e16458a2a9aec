use typefill_shapes::TypeShape;
use typefill_values::Value;

use crate::{
    BindContext, CoercionToken, FillRun, Filler, FillerError, FillerToken, ListFiller, MapFiller,
    ScalarFiller, TypeCheckStyle, UnionFiller, ValidationToken,
};

/// One concrete [`Filler`] per shape family.
#[derive(Debug)]
pub enum ShapedFiller {
    Scalar(ScalarFiller),
    List(ListFiller),
    Map(MapFiller),
    Union(UnionFiller),
}

impl ShapedFiller {
    /// Builds a filler tree for `shape`, with `check` styling pre-seeded
    /// at every node.
    ///
    /// Tokens appended afterwards apply on top of the seed, so a later
    /// style token overrides it (last write wins).
    ///
    /// ```rust
    /// use typefill_fillers::{BindContext, Filler, ShapedFiller};
    /// use typefill_shapes::TypeShape;
    /// use typefill_values::Value;
    ///
    /// # fn main() -> Result<(), typefill_fillers::FillerError> {
    /// let mut filler = ShapedFiller::for_shape(&TypeShape::Int.optional());
    /// filler.bind(&BindContext::new("Track", "number"))?;
    ///
    /// assert_eq!(filler.fill(Value::Null).finish()?, Value::Null);
    /// assert_eq!(filler.fill(Value::Int(7)).finish()?, Value::Int(7));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn for_shape(shape: &TypeShape) -> Self {
        let filler = match shape {
            TypeShape::List(inner) => Self::List(ListFiller::of(Self::for_shape(inner))),
            TypeShape::Map(inner) => Self::Map(MapFiller::of(Self::for_shape(inner))),
            TypeShape::Union(variants) => Self::Union(UnionFiller::new(
                variants.iter().map(Self::for_shape).collect(),
            )),
            shape => Self::Scalar(ScalarFiller::of(shape.clone())),
        };
        filler.with_style(TypeCheckStyle::Check)
    }

    /// The declared shape this filler fills.
    #[must_use]
    pub const fn origin(&self) -> &TypeShape {
        match self {
            Self::Scalar(filler) => filler.origin(),
            Self::List(filler) => filler.origin(),
            Self::Map(filler) => filler.origin(),
            Self::Union(filler) => filler.origin(),
        }
    }

    /// The bound checking style. `Default` until [`Filler::bind`] runs.
    #[must_use]
    pub const fn style(&self) -> TypeCheckStyle {
        match self {
            Self::Scalar(filler) => filler.style(),
            Self::List(filler) => filler.style(),
            Self::Map(filler) => filler.style(),
            Self::Union(filler) => filler.style(),
        }
    }

    /// Appends a configuration token to apply at bind time.
    #[must_use]
    pub fn with_token(self, token: FillerToken) -> Self {
        match self {
            Self::Scalar(filler) => Self::Scalar(filler.with_token(token)),
            Self::List(filler) => Self::List(filler.with_token(token)),
            Self::Map(filler) => Self::Map(filler.with_token(token)),
            Self::Union(filler) => Self::Union(filler.with_token(token)),
        }
    }

    #[must_use]
    pub fn with_style(self, style: TypeCheckStyle) -> Self {
        self.with_token(FillerToken::Style(style))
    }

    #[must_use]
    pub fn with_coercer(self, token: CoercionToken) -> Self {
        self.with_token(FillerToken::Coercion(token))
    }

    #[must_use]
    pub fn with_validator(self, token: ValidationToken) -> Self {
        self.with_token(FillerToken::Validation(token))
    }
}

impl Filler for ShapedFiller {
    fn fill(&self, value: Value) -> FillRun<'_> {
        match self {
            Self::Scalar(filler) => filler.fill(value),
            Self::List(filler) => filler.fill(value),
            Self::Map(filler) => filler.fill(value),
            Self::Union(filler) => filler.fill(value),
        }
    }

    fn bind(&mut self, ctx: &BindContext<'_>) -> Result<(), FillerError> {
        match self {
            Self::Scalar(filler) => filler.bind(ctx),
            Self::List(filler) => filler.bind(ctx),
            Self::Map(filler) => filler.bind(ctx),
            Self::Union(filler) => filler.bind(ctx),
        }
    }
}
