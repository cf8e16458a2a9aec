#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! # `TypeFill` fillers
//!
//! The staged field-filling pipeline. A [`Filler`] takes one raw
//! [`Value`] and produces a typed, validated value in three stages:
//! type check, then coercion when the check fails, then validation.
//! Each stage boundary suspends the computation with a [`FillingIntent`]
//! so a driver can observe progress or abandon the run, which is how
//! union shapes arbitrate several candidate fillers over one slot.
//!
//! Fillers are configured once through [`Filler::bind`], which applies
//! the declaration's [`FillerToken`]s in order, and are then reused for
//! every fill of their field.
//!
//! ```rust
//! use typefill_fillers::{BindContext, Filler, ScalarFiller, TypeCheckStyle, coercers, validators};
//! use typefill_shapes::TypeShape;
//! use typefill_values::Value;
//!
//! # fn main() -> Result<(), typefill_fillers::FillerError> {
//! let mut filler = ScalarFiller::of(TypeShape::Int)
//!     .with_style(TypeCheckStyle::Check)
//!     .with_coercer(coercers::parse_int())
//!     .with_validator(validators::int_range(0, i64::MAX));
//!
//! filler.bind(&BindContext::new("Order", "quantity"))?;
//!
//! assert_eq!(filler.fill(Value::Int(5)).finish()?, Value::Int(5));
//! assert_eq!(filler.fill(Value::Str("5".into())).finish()?, Value::Int(5));
//! # Ok(())
//! # }
//! ```

use thiserror::Error;
use typefill_values::{Value, ValueKind};

mod annotated;
mod containers;
mod run;
mod scalar;
mod shaped;
mod union;

pub mod coercers;
pub mod validators;

pub use annotated::{AnnotatedFiller, ShapeBehavior};
pub use containers::{ListCheck, ListFiller, MapCheck, MapFiller};
pub use run::{FillRun, FillStep};
pub use scalar::{ScalarCheck, ScalarFiller};
pub use shaped::ShapedFiller;
pub use union::UnionFiller;

/// How a filler checks an incoming value against its declared shape.
///
/// `Default` is the unconfigured sentinel. It is invalid both at bind
/// time and at fill time; a bind that leaves it in place fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCheckStyle {
    #[default]
    Default,
    /// Skip checking entirely and accept the value as-is.
    Hollow,
    /// Accept the declared kind or a subkind of it.
    Check,
    /// Accept exactly the declared kind, no subkinds.
    CheckStrict,
}

/// An observable checkpoint yielded between fill stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillingIntent {
    /// About to check the value against the declared shape.
    AttemptNoCoerce,
    /// The check failed, about to scan the coercers.
    AttemptCoerce,
    /// Hollow style, about to accept the value unchecked.
    AttemptHollow,
    /// About to run the validators. Always the last intent.
    AttemptValidation,
}

impl std::fmt::Display for FillingIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AttemptNoCoerce => "attempt_no_coerce",
            Self::AttemptCoerce => "attempt_coerce",
            Self::AttemptHollow => "attempt_hollow",
            Self::AttemptValidation => "attempt_validation",
        })
    }
}

/// A resolved coercion callable. Coercers are tried in declaration
/// order against the original value; the first success stops the scan.
pub type Coercer = Box<dyn Fn(&Value) -> Result<Value, CoercionError> + Send + Sync>;

/// A resolved validation callable. Validators chain, each one's output
/// feeding the next.
pub type Validator = Box<dyn Fn(Value) -> Result<Value, ValidationError> + Send + Sync>;

/// A coercion token from the owning declaration.
///
/// `Func` is directly invokable and always resolves. `Registry` names a
/// coercer by string; base resolution rejects it, and only fillers that
/// understand the name (the scalar filler's `"parse"`) resolve it.
pub enum CoercionToken {
    Func(Coercer),
    Registry(String),
}

impl CoercionToken {
    pub fn func(
        coercer: impl Fn(&Value) -> Result<Value, CoercionError> + Send + Sync + 'static,
    ) -> Self {
        Self::Func(Box::new(coercer))
    }

    pub fn registry(name: impl Into<String>) -> Self {
        Self::Registry(name.into())
    }

    /// Base resolution: only directly invokable tokens are accepted.
    ///
    /// # Errors
    ///
    /// * If the token is not directly invokable as a unary callable
    pub fn into_coercer(self) -> Result<Coercer, ConfigurationError> {
        match self {
            Self::Func(coercer) => Ok(coercer),
            Self::Registry(name) => Err(ConfigurationError::NotInvokable { token: name }),
        }
    }
}

impl std::fmt::Debug for CoercionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Func(_) => f.write_str("Func(..)"),
            Self::Registry(name) => f.debug_tuple("Registry").field(name).finish(),
        }
    }
}

/// A validation token from the owning declaration.
pub enum ValidationToken {
    Func(Validator),
    Registry(String),
}

impl ValidationToken {
    pub fn func(
        validator: impl Fn(Value) -> Result<Value, ValidationError> + Send + Sync + 'static,
    ) -> Self {
        Self::Func(Box::new(validator))
    }

    pub fn registry(name: impl Into<String>) -> Self {
        Self::Registry(name.into())
    }

    /// Base resolution: only directly invokable tokens are accepted.
    ///
    /// # Errors
    ///
    /// * If the token is not directly invokable as a unary callable
    pub fn into_validator(self) -> Result<Validator, ConfigurationError> {
        match self {
            Self::Func(validator) => Ok(validator),
            Self::Registry(name) => Err(ConfigurationError::NotInvokable { token: name }),
        }
    }
}

impl std::fmt::Debug for ValidationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Func(_) => f.write_str("Func(..)"),
            Self::Registry(name) => f.debug_tuple("Registry").field(name).finish(),
        }
    }
}

/// One configuration token from the owning declaration, applied during
/// [`Filler::bind`] in declaration order.
#[derive(Debug)]
pub enum FillerToken {
    /// Overwrites the checking style. Last write wins.
    Style(TypeCheckStyle),
    /// Resolves to a callable and appends to the coercers.
    Coercion(CoercionToken),
    /// Resolves to a callable and appends to the validators.
    Validation(ValidationToken),
}

/// The identity of the declaration a filler is being bound against,
/// used for bind-time logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindContext<'a> {
    owner: &'a str,
    field: &'a str,
}

impl<'a> BindContext<'a> {
    #[must_use]
    pub const fn new(owner: &'a str, field: &'a str) -> Self {
        Self { owner, field }
    }

    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner
    }

    #[must_use]
    pub const fn field(&self) -> &str {
        self.field
    }
}

impl std::fmt::Display for BindContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.owner, self.field)
    }
}

/// The per-field filling strategy.
///
/// A filler is constructed with its shape and tokens, configured once
/// through [`bind`](Filler::bind), then invoked once per fill. Each
/// [`fill`](Filler::fill) returns a fresh suspendable [`FillRun`];
/// dropping a run abandons it with no effect beyond the value
/// transformations it already performed.
pub trait Filler: Send + Sync + std::fmt::Debug {
    /// Starts a staged fill of `value`.
    fn fill(&self, value: Value) -> FillRun<'_>;

    /// Applies the pending configuration tokens in declaration order.
    ///
    /// # Errors
    ///
    /// * If a token does not resolve to a callable
    /// * If the style is left unconfigured once all tokens are applied
    /// * If hollow checking is combined with coercers
    /// * If strict checking is requested against an abstract shape
    fn bind(&mut self, ctx: &BindContext<'_>) -> Result<(), FillerError>;
}

/// A filler was misconfigured. Always fatal to the field being bound.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("filling style was never configured")]
    Unconfigured,
    #[error("hollow checking cannot be combined with coercers")]
    HollowCoercers,
    #[error("token `{token}` does not resolve to a unary callable")]
    NotInvokable { token: String },
    #[error("strict checking is not supported for abstract shape `{shape}`")]
    StrictUnsupported { shape: String },
}

/// A coercer refused or failed to convert a value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[error("cannot coerce `{from}` into {to}")]
    Unsupported { from: ValueKind, to: &'static str },
    #[error("coercion failed: {0}")]
    Failed(String),
}

/// A validator rejected an already type-conformant value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("validation rejected value: {0}")]
    Rejected(String),
}

/// Any failure a fill or bind can surface. The four kinds propagate
/// uncaught to the caller; fillers perform no local recovery.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FillerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The type check failed and no coercers were configured. Carries
    /// the offending value's runtime kind.
    #[error("failed type checking for value of kind `{kind}`")]
    TypeMismatch { kind: ValueKind },
    /// Every coercer failed; this is the last one's error. Earlier
    /// failures only gate trying the next coercer.
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
