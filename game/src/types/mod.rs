//! Domain types for the scoring engine

mod count;
mod outcome;
mod runners;
mod side;
mod state;
mod stats;

pub use count::{Count, MAX_BALLS, MAX_STRIKES, PitchStep};
pub use outcome::{MAX_OUTS, OutcomeInfo, OutcomeResult, PlayContext, catalog, resolve};
pub use runners::RunnerState;
pub use side::{BatSlot, LINEUP_SIZE, Side};
pub use state::{GameState, RetiredSide};
pub use stats::plate_appearance_delta;
