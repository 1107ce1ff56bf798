//! Outcome catalog
//!
//! Each outcome is a pure function of the pre-play situation. The result is the
//! *default* resolution; the runner prompts in [`crate::tracking`] let the
//! scorer override where runners ended up.

use scorebook_protocol::OutcomeKey;

use super::count::Count;
use super::runners::RunnerState;

/// Outs ceiling inside a single play; three outs retire the side
pub const MAX_OUTS: u8 = 3;

/// The situation an outcome is applied to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayContext {
    pub count: Count,
    pub outs: u8,
    pub runners: RunnerState,
}

/// Proposed next situation plus runs attributable to this play
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutcomeResult {
    pub count: Count,
    pub outs: u8,
    pub runners: RunnerState,
    pub runs_scored: u32,

    /// Bases whose runner the default resolution moved by assumption rather
    /// than by force (hits move every runner this way, walks never do)
    pub presumed_moved: RunnerState,
}

/// A catalog entry for menu presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeInfo {
    pub key: OutcomeKey,
    pub label: &'static str,
}

/// The outcome menu, in presentation order
pub fn catalog() -> Vec<OutcomeInfo> {
    OutcomeKey::ALL
        .into_iter()
        .map(|key| OutcomeInfo {
            key,
            label: key.label(),
        })
        .collect()
}

/// Compute the default resolution of `key` in the situation `ctx`
pub fn resolve(key: OutcomeKey, ctx: &PlayContext) -> OutcomeResult {
    let r = ctx.runners;
    let scored = |occupied: bool| occupied as u32;

    let (runners, runs_scored, presumed_moved) = match key {
        OutcomeKey::Single => (
            RunnerState::new(true, r.first, r.second),
            scored(r.third),
            r,
        ),
        OutcomeKey::Double => (
            RunnerState::new(false, true, r.first),
            scored(r.third) + scored(r.second),
            r,
        ),
        OutcomeKey::Triple => (
            RunnerState::new(false, false, true),
            r.occupied_count(),
            r,
        ),
        OutcomeKey::HomeRun => (RunnerState::empty(), r.occupied_count() + 1, r),
        OutcomeKey::Walk => {
            // Only forced runners move: each base is taken only if every base
            // behind it was occupied.
            let forced_to_second = r.first;
            let forced_to_third = r.first && r.second;
            (
                RunnerState::new(
                    true,
                    r.second || forced_to_second,
                    r.third || forced_to_third,
                ),
                scored(r.is_loaded()),
                RunnerState::empty(),
            )
        }
        OutcomeKey::Strikeout
        | OutcomeKey::Groundout
        | OutcomeKey::Flyout
        | OutcomeKey::Foul => (r, 0, RunnerState::empty()),
    };

    let outs = if key.is_out() {
        (ctx.outs + 1).min(MAX_OUTS)
    } else {
        ctx.outs
    };

    let count = if key.is_final() {
        Count::new()
    } else {
        ctx.count.foul()
    };

    OutcomeResult {
        count,
        outs,
        runners,
        runs_scored,
        presumed_moved,
    }
}
