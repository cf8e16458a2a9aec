use typefill_shapes::TypeShape;
use typefill_values::Value;

use crate::{
    BindContext, CoercionToken, ConfigurationError, FillRun, FillStep, Filler, FillerError,
    FillerToken, FillingIntent, ShapedFiller, TypeCheckStyle, ValidationToken,
    annotated::FillerConfig,
};

/// A filler that arbitrates several candidate fillers over one slot.
///
/// Variants race in declaration order. A variant whose check succeeds
/// without coercion claims the slot and pre-empts every sibling's
/// coercers; only when no variant claims are the paused candidates
/// allowed to coerce, in order, and after all of them lose the union
/// falls back to its own coercers. The winner's value still flows
/// through the union's own validators.
#[derive(Debug)]
pub struct UnionFiller {
    origin: TypeShape,
    tokens: Vec<FillerToken>,
    config: FillerConfig,
    variants: Vec<ShapedFiller>,
}

impl UnionFiller {
    #[must_use]
    pub fn new(variants: Vec<ShapedFiller>) -> Self {
        let origin = TypeShape::Union(
            variants
                .iter()
                .map(|variant| variant.origin().clone())
                .collect(),
        );
        Self {
            origin,
            tokens: Vec::new(),
            config: FillerConfig::default(),
            variants,
        }
    }

    /// The declared union shape, assembled from the variant shapes.
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

impl Filler for UnionFiller {
    fn fill(&self, value: Value) -> FillRun<'_> {
        FillRun::union(UnionRun {
            filler: self,
            stage: UnionStage::Start { value },
        })
    }

    fn bind(&mut self, ctx: &BindContext<'_>) -> Result<(), FillerError> {
        log::debug!("{ctx}: binding union filler for shape `{}`", self.origin);

        for token in std::mem::take(&mut self.tokens) {
            match token {
                FillerToken::Style(style) => self.config.style = style,
                FillerToken::Coercion(token) => self.config.coercers.push(token.into_coercer()?),
                FillerToken::Validation(token) => {
                    self.config.validators.push(token.into_validator()?);
                }
            }
        }

        self.config.ensure_consistent()?;

        if self.config.style == TypeCheckStyle::CheckStrict {
            return Err(ConfigurationError::StrictUnsupported {
                shape: self.origin.to_string(),
            }
            .into());
        }

        for variant in &mut self.variants {
            variant.bind(ctx)?;
        }

        log::debug!(
            "{ctx}: bound {:?} with {} variants",
            self.config,
            self.variants.len(),
        );
        Ok(())
    }
}

/// The arbitration machine behind [`UnionFiller`].
#[derive(Debug)]
pub(crate) struct UnionRun<'f> {
    filler: &'f UnionFiller,
    stage: UnionStage<'f>,
}

#[derive(Debug)]
enum UnionStage<'f> {
    Start { value: Value },
    /// Suspended at `attempt_no_coerce`; resuming probes the variants.
    Probing { value: Value },
    /// Suspended at `attempt_coerce`; resuming lets the paused variants
    /// coerce, then falls back to the union's own coercers.
    Coercing {
        value: Value,
        paused: Vec<FillRun<'f>>,
    },
    /// Suspended at `attempt_hollow`; the value is accepted unprobed.
    Accepted { value: Value },
    /// Suspended at `attempt_validation`; resuming runs the union's own
    /// validators over the winning value.
    Validating { value: Value },
}

impl<'f> UnionRun<'f> {
    pub(crate) fn step(self) -> Result<FillStep<'f>, FillerError> {
        let Self { filler, stage } = self;

        let suspend = |intent: FillingIntent, stage: UnionStage<'f>| {
            log::trace!("fill of `{}` suspended at {intent}", filler.origin);
            Ok(FillStep::Suspended {
                intent,
                run: FillRun::union(UnionRun { filler, stage }),
            })
        };

        match stage {
            UnionStage::Start { value } => match filler.config.style {
                TypeCheckStyle::Default => Err(ConfigurationError::Unconfigured.into()),
                TypeCheckStyle::Hollow => {
                    suspend(FillingIntent::AttemptHollow, UnionStage::Accepted { value })
                }
                TypeCheckStyle::Check | TypeCheckStyle::CheckStrict => {
                    suspend(FillingIntent::AttemptNoCoerce, UnionStage::Probing { value })
                }
            },
            UnionStage::Probing { value } => {
                let mut paused = Vec::new();

                for (index, variant) in filler.variants.iter().enumerate() {
                    match probe(variant.fill(value.clone()))? {
                        Probe::Claimed(run) => {
                            log::trace!("union variant {index} claimed the slot without coercion");
                            let value = run.finish()?;
                            return suspend(
                                FillingIntent::AttemptValidation,
                                UnionStage::Validating { value },
                            );
                        }
                        Probe::Finished(value) => {
                            log::trace!("union variant {index} completed during the probe");
                            return suspend(
                                FillingIntent::AttemptValidation,
                                UnionStage::Validating { value },
                            );
                        }
                        Probe::Paused(run) => paused.push(run),
                        Probe::Lost(error) => {
                            log::trace!("union variant {index} lost the check: {error}");
                        }
                    }
                }

                suspend(
                    FillingIntent::AttemptCoerce,
                    UnionStage::Coercing { value, paused },
                )
            }
            UnionStage::Coercing { value, paused } => {
                for (index, run) in paused.into_iter().enumerate() {
                    match resume(run)? {
                        Resumed::Won(value) => {
                            log::trace!("paused union variant {index} coerced the value");
                            return suspend(
                                FillingIntent::AttemptValidation,
                                UnionStage::Validating { value },
                            );
                        }
                        Resumed::Lost(error) => {
                            log::trace!("paused union variant {index} lost the coercion: {error}");
                        }
                    }
                }

                let value = filler.config.run_coercers(&value)?;
                suspend(
                    FillingIntent::AttemptValidation,
                    UnionStage::Validating { value },
                )
            }
            UnionStage::Accepted { value } => suspend(
                FillingIntent::AttemptValidation,
                UnionStage::Validating { value },
            ),
            UnionStage::Validating { value } => Ok(FillStep::Complete {
                value: filler.config.run_validators(value)?,
            }),
        }
    }
}

/// A candidate's configuration error is never treated as a loss.
const fn is_fatal(error: &FillerError) -> bool {
    matches!(error, FillerError::Configuration(_))
}

enum Probe<'f> {
    /// Suspended at `attempt_validation`: the check succeeded and the
    /// variant has claimed the slot.
    Claimed(FillRun<'f>),
    /// Completed within the probe window.
    Finished(Value),
    /// Suspended at `attempt_coerce`, waiting for permission to coerce.
    Paused(FillRun<'f>),
    Lost(FillerError),
}

/// Drives a fresh candidate run up to its check outcome: two steps, the
/// opening intent and the check itself. Nothing past the check runs, so
/// a pre-empted candidate never invokes its coercers.
fn probe(run: FillRun<'_>) -> Result<Probe<'_>, FillerError> {
    let run = match run.step() {
        Ok(FillStep::Suspended { run, .. }) => run,
        Ok(FillStep::Complete { value }) => return Ok(Probe::Finished(value)),
        Err(error) if is_fatal(&error) => return Err(error),
        Err(error) => return Ok(Probe::Lost(error)),
    };

    match run.step() {
        Ok(FillStep::Suspended {
            intent: FillingIntent::AttemptValidation,
            run,
        }) => Ok(Probe::Claimed(run)),
        Ok(FillStep::Suspended { run, .. }) => Ok(Probe::Paused(run)),
        Ok(FillStep::Complete { value }) => Ok(Probe::Finished(value)),
        Err(error) if is_fatal(&error) => Err(error),
        Err(error) => Ok(Probe::Lost(error)),
    }
}

enum Resumed {
    Won(Value),
    Lost(FillerError),
}

/// Resumes a paused candidate through its coercion and the rest of its
/// run. The first candidate to complete supplies the union's value.
fn resume(run: FillRun<'_>) -> Result<Resumed, FillerError> {
    match run.finish() {
        Ok(value) => Ok(Resumed::Won(value)),
        Err(error) if is_fatal(&error) => Err(error),
        Err(error) => Ok(Resumed::Lost(error)),
    }
}
