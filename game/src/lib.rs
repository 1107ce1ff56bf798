//! At-bat outcome engine for amateur baseball scorekeeping.
//!
//! This crate turns scorer actions (balls, strikes, plate appearance outcomes,
//! runner prompt answers) into game state: count, outs, runners, runs and
//! innings. It is synchronous and performs no I/O; storage work it needs done
//! is returned as [`Effect`]s for the host to carry out.
//!
//! # Overview
//!
//! ```text
//! scorebook-protocol (paths, records, command language)
//!        │
//!        ▼
//! scorebook-game (outcome engine) ← THIS CRATE
//!        │
//!        └─> scorebook-client (async session + storage adapter)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`Count`], [`RunnerState`], [`GameState`] - the live situation
//! - [`OutcomeResult`] and [`resolve`] - the outcome catalog
//! - [`BatSlot`], [`Side`] - batting order and teams
//!
//! ## Tracking
//! - [`Scorebook`] - owns one game; all mutation goes through [`Scorebook::dispatch`]
//! - [`PendingResolution`], [`RunnerPrompt`] - runner disambiguation
//!
//! # Example Usage
//!
//! ```
//! use scorebook_game::{Action, OutcomeKey, RunnerChoice, RunnerState, Scorebook};
//!
//! let mut book = Scorebook::new();
//! book.dispatch(Action::Outcome(OutcomeKey::Walk)).unwrap();
//! assert_eq!(book.state().runners, RunnerState::new(true, false, false));
//!
//! // A single with a runner on first asks where that runner went
//! let transition = book.dispatch(Action::Outcome(OutcomeKey::Single)).unwrap();
//! assert!(transition.prompt.is_some());
//!
//! let transition = book.dispatch(Action::Runner(RunnerChoice::ToThird)).unwrap();
//! assert!(transition.committed.is_some());
//! ```

mod error;
pub mod query;
pub mod tracking;
pub mod types;

pub use error::GameError;
pub use tracking::{
    Action, CommittedPlay, Effect, History, PendingResolution, RunnerPrompt, Scorebook,
    Transition,
};
pub use types::{
    BatSlot, Count, GameState, LINEUP_SIZE, MAX_BALLS, MAX_OUTS, MAX_STRIKES, OutcomeInfo,
    OutcomeResult, PitchStep, PlayContext, RetiredSide, RunnerState, Side, catalog,
    plate_appearance_delta, resolve,
};

// Re-export the play vocabulary
pub use scorebook_protocol::{Base, OutcomeKey, RunnerChoice, StatField, StatLine};
