use scorebook_protocol::{Base, RunnerChoice};
use thiserror::Error;

/// Actions the engine refuses; state is left untouched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Runner on {0} must be resolved before anything else")]
    ResolutionPending(Base),

    #[error("No runner is waiting to be resolved")]
    NoPendingResolution,

    #[error("Runner on {base} cannot be marked '{choice}'")]
    IllegalRunnerChoice { base: Base, choice: RunnerChoice },
}
