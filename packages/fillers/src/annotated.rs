use typefill_shapes::TypeShape;
use typefill_values::Value;

use crate::{
    BindContext, Coercer, CoercionToken, ConfigurationError, FillRun, Filler, FillerError,
    FillerToken, TypeCheckStyle, ValidationToken, Validator,
};

/// The shape-specific half of an [`AnnotatedFiller`].
///
/// The base drives the staged algorithm; implementers supply how their
/// shape family checks values, and may refine a checked value (the
/// container fillers recurse into elements here), bind owned child
/// fillers, and resolve richer tokens than the base accepts.
pub trait ShapeBehavior: Send + Sync + std::fmt::Debug {
    /// Whether `value` belongs to `origin`, counting subkinds.
    fn type_check(&self, origin: &TypeShape, value: &Value) -> bool;

    /// Whether `value` is exactly of `origin`, no subkinds.
    fn type_check_strict(&self, origin: &TypeShape, value: &Value) -> bool;

    /// Whether strict checking is meaningful for `origin`. Abstract
    /// origins refuse it, which [`Filler::bind`] reports as a
    /// configuration error.
    fn strict_checkable(&self, _origin: &TypeShape) -> bool {
        true
    }

    /// Reworks a value that passed checking or coercion, before
    /// validation. Container fillers fill their elements here; the
    /// hollow style bypasses refinement along with the check.
    ///
    /// # Errors
    ///
    /// * If an owned child filler fails, the child's error propagates
    ///   as-is
    fn refine(&self, value: Value) -> Result<Value, FillerError> {
        Ok(value)
    }

    /// Binds any owned child fillers.
    ///
    /// # Errors
    ///
    /// * If a child filler fails to bind
    fn bind_children(&mut self, _ctx: &BindContext<'_>) -> Result<(), FillerError> {
        Ok(())
    }

    /// Resolves a coercion token. The base accepts only directly
    /// invokable tokens; implementers may resolve registry names they
    /// understand before falling back.
    ///
    /// # Errors
    ///
    /// * If the token does not resolve to a callable
    fn resolve_coercion(
        &self,
        _origin: &TypeShape,
        token: CoercionToken,
    ) -> Result<Coercer, ConfigurationError> {
        token.into_coercer()
    }

    /// Resolves a validation token, with the same contract as
    /// [`resolve_coercion`](ShapeBehavior::resolve_coercion).
    ///
    /// # Errors
    ///
    /// * If the token does not resolve to a callable
    fn resolve_validation(
        &self,
        _origin: &TypeShape,
        token: ValidationToken,
    ) -> Result<Validator, ConfigurationError> {
        token.into_validator()
    }
}

/// Bound configuration shared by the staged machines: the checking
/// style plus the resolved coercer and validator chains.
#[derive(Default)]
pub(crate) struct FillerConfig {
    pub(crate) style: TypeCheckStyle,
    pub(crate) coercers: Vec<Coercer>,
    pub(crate) validators: Vec<Validator>,
}

impl FillerConfig {
    /// Bind post-conditions: a concrete style, and hollow only without
    /// coercers.
    pub(crate) fn ensure_consistent(&self) -> Result<(), ConfigurationError> {
        if self.style == TypeCheckStyle::Default {
            return Err(ConfigurationError::Unconfigured);
        }
        if self.style == TypeCheckStyle::Hollow && !self.coercers.is_empty() {
            return Err(ConfigurationError::HollowCoercers);
        }
        Ok(())
    }

    /// Scans the coercers in order against `value`. A failing coercer
    /// is skipped in favor of the next; the last failure propagates.
    ///
    /// # Errors
    ///
    /// * `FillerError::TypeMismatch` if no coercers are configured
    /// * `FillerError::Coercion` with the last coercer's error if every
    ///   coercer fails
    pub(crate) fn run_coercers(&self, value: &Value) -> Result<Value, FillerError> {
        let Some((last, rest)) = self.coercers.split_last() else {
            return Err(FillerError::TypeMismatch { kind: value.kind() });
        };

        for (index, coercer) in rest.iter().enumerate() {
            match coercer(value) {
                Ok(coerced) => return Ok(coerced),
                Err(error) => {
                    log::trace!("coercer {index} failed, trying next: {error}");
                }
            }
        }

        Ok(last(value)?)
    }

    /// Chains the validators over `value` in order.
    ///
    /// # Errors
    ///
    /// * The first validator rejection, unchanged
    pub(crate) fn run_validators(&self, mut value: Value) -> Result<Value, FillerError> {
        for validator in &self.validators {
            value = validator(value)?;
        }
        Ok(value)
    }
}

impl std::fmt::Debug for FillerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FillerConfig")
            .field("style", &self.style)
            .field("coercers", &self.coercers.len())
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// The reference [`Filler`]: owns the declared shape, the pending
/// tokens, the bound configuration, and a [`ShapeBehavior`] for the
/// shape family. Owned exclusively by the field it fills.
#[derive(Debug)]
pub struct AnnotatedFiller<B: ShapeBehavior> {
    origin: TypeShape,
    tokens: Vec<FillerToken>,
    config: FillerConfig,
    behavior: B,
}

impl<B: ShapeBehavior> AnnotatedFiller<B> {
    #[must_use]
    pub fn new(origin: TypeShape, behavior: B) -> Self {
        Self {
            origin,
            tokens: Vec::new(),
            config: FillerConfig::default(),
            behavior,
        }
    }

    /// The declared shape this filler fills.
    #[must_use]
    pub const fn origin(&self) -> &TypeShape {
        &self.origin
    }

    /// The bound checking style. `Default` until [`Filler::bind`] runs.
    #[must_use]
    pub const fn style(&self) -> TypeCheckStyle {
        self.config.style
    }

    /// Appends a configuration token to apply at bind time.
    #[must_use]
    pub fn with_token(mut self, token: FillerToken) -> Self {
        self.tokens.push(token);
        self
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

impl<B: ShapeBehavior> Filler for AnnotatedFiller<B> {
    fn fill(&self, value: Value) -> FillRun<'_> {
        FillRun::staged(&self.origin, &self.config, &self.behavior, value)
    }

    fn bind(&mut self, ctx: &BindContext<'_>) -> Result<(), FillerError> {
        log::debug!("{ctx}: binding filler for shape `{}`", self.origin);

        for token in std::mem::take(&mut self.tokens) {
            match token {
                FillerToken::Style(style) => self.config.style = style,
                FillerToken::Coercion(token) => self
                    .config
                    .coercers
                    .push(self.behavior.resolve_coercion(&self.origin, token)?),
                FillerToken::Validation(token) => self
                    .config
                    .validators
                    .push(self.behavior.resolve_validation(&self.origin, token)?),
            }
        }

        self.config.ensure_consistent()?;

        if self.config.style == TypeCheckStyle::CheckStrict
            && !self.behavior.strict_checkable(&self.origin)
        {
            return Err(ConfigurationError::StrictUnsupported {
                shape: self.origin.to_string(),
            }
            .into());
        }

        self.behavior.bind_children(ctx)?;

        log::debug!("{ctx}: bound {:?}", self.config);
        Ok(())
    }
}
