//! Game state tracking from scorer actions

mod history;
mod reducer;
mod resolution;
mod scorebook;

pub use history::History;
pub use reducer::{Action, CommittedPlay, Effect, Transition};
pub use resolution::{
    PendingResolution, RunnerPrompt, apply_choice, legal_choices, runner_prompts,
};
pub use scorebook::Scorebook;
