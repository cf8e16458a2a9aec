use typefill_shapes::TypeShape;
use typefill_values::Value;

use crate::{
    FillerError, FillingIntent, ShapeBehavior, TypeCheckStyle, annotated::FillerConfig,
    union::UnionRun,
};

/// One suspendable fill of one value.
///
/// A run advances by consuming itself: [`step`](FillRun::step) either
/// suspends at the next [`FillingIntent`] and hands back the resumable
/// run, or completes with the filled value. Dropping a suspended run
/// abandons the fill; a completed run cannot be resumed, by
/// construction.
#[derive(Debug)]
pub struct FillRun<'f> {
    state: RunState<'f>,
}

#[derive(Debug)]
enum RunState<'f> {
    Staged(StagedRun<'f>),
    Union(UnionRun<'f>),
}

/// The observable outcome of one [`FillRun::step`].
#[derive(Debug)]
pub enum FillStep<'f> {
    /// The run paused at an intent boundary and can be resumed or
    /// dropped.
    Suspended {
        intent: FillingIntent,
        run: FillRun<'f>,
    },
    /// The run produced its final value.
    Complete { value: Value },
}

impl<'f> FillRun<'f> {
    pub(crate) fn staged(
        origin: &'f TypeShape,
        config: &'f FillerConfig,
        behavior: &'f dyn ShapeBehavior,
        value: Value,
    ) -> Self {
        Self {
            state: RunState::Staged(StagedRun {
                origin,
                config,
                behavior,
                stage: Stage::Start { value },
            }),
        }
    }

    pub(crate) fn union(run: UnionRun<'f>) -> Self {
        Self {
            state: RunState::Union(run),
        }
    }

    /// Advances to the next intent boundary or to completion.
    ///
    /// # Errors
    ///
    /// * `FillerError::Configuration` if the style was never configured
    /// * `FillerError::TypeMismatch` if the check failed with no
    ///   coercers to fall back on
    /// * `FillerError::Coercion` if every coercer failed
    /// * `FillerError::Validation` if a validator rejected the value
    pub fn step(self) -> Result<FillStep<'f>, FillerError> {
        match self.state {
            RunState::Staged(run) => run.step(),
            RunState::Union(run) => run.step(),
        }
    }

    /// Drives the run to completion, ignoring the intents.
    ///
    /// # Errors
    ///
    /// * Whatever [`step`](FillRun::step) surfaces on the way
    pub fn finish(self) -> Result<Value, FillerError> {
        let mut run = self;
        loop {
            match run.step()? {
                FillStep::Suspended { run: next, .. } => run = next,
                FillStep::Complete { value } => return Ok(value),
            }
        }
    }
}

/// The staged machine behind [`AnnotatedFiller`](crate::AnnotatedFiller).
///
/// Stages map one-to-one onto the suspension points: `Start` has not
/// yielded yet, and each later stage is the work that runs when the
/// driver steps past the matching intent.
#[derive(Debug)]
struct StagedRun<'f> {
    origin: &'f TypeShape,
    config: &'f FillerConfig,
    behavior: &'f dyn ShapeBehavior,
    stage: Stage,
}

#[derive(Debug)]
enum Stage {
    Start { value: Value },
    /// Suspended at `attempt_no_coerce`; resuming runs the type check.
    Checking { value: Value },
    /// Suspended at `attempt_coerce`; resuming runs the coercer scan.
    Coercing { value: Value },
    /// Suspended at `attempt_hollow`; the value is accepted unchecked.
    Accepted { value: Value },
    /// Suspended at `attempt_validation`; resuming runs the validators.
    Validating { value: Value },
}

impl<'f> StagedRun<'f> {
    fn step(self) -> Result<FillStep<'f>, FillerError> {
        let Self {
            origin,
            config,
            behavior,
            stage,
        } = self;

        let suspend = |intent: FillingIntent, stage: Stage| {
            log::trace!("fill of `{origin}` suspended at {intent}");
            Ok(FillStep::Suspended {
                intent,
                run: FillRun {
                    state: RunState::Staged(StagedRun {
                        origin,
                        config,
                        behavior,
                        stage,
                    }),
                },
            })
        };

        match stage {
            Stage::Start { value } => match config.style {
                TypeCheckStyle::Default => {
                    Err(crate::ConfigurationError::Unconfigured.into())
                }
                TypeCheckStyle::Hollow => {
                    suspend(FillingIntent::AttemptHollow, Stage::Accepted { value })
                }
                TypeCheckStyle::Check | TypeCheckStyle::CheckStrict => {
                    suspend(FillingIntent::AttemptNoCoerce, Stage::Checking { value })
                }
            },
            Stage::Checking { value } => {
                let passes = if config.style == TypeCheckStyle::CheckStrict {
                    behavior.type_check_strict(origin, &value)
                } else {
                    behavior.type_check(origin, &value)
                };

                if passes {
                    let value = behavior.refine(value)?;
                    suspend(FillingIntent::AttemptValidation, Stage::Validating { value })
                } else {
                    suspend(FillingIntent::AttemptCoerce, Stage::Coercing { value })
                }
            }
            Stage::Coercing { value } => {
                let value = behavior.refine(config.run_coercers(&value)?)?;
                suspend(FillingIntent::AttemptValidation, Stage::Validating { value })
            }
            Stage::Accepted { value } => {
                suspend(FillingIntent::AttemptValidation, Stage::Validating { value })
            }
            Stage::Validating { value } => Ok(FillStep::Complete {
                value: config.run_validators(value)?,
            }),
        }
    }
}
