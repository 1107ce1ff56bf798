//! Action processing for the scorebook

use scorebook_protocol::{OutcomeKey, RunnerChoice, StatLine};

use super::resolution::{PendingResolution, RunnerPrompt};
use super::scorebook::Scorebook;
use crate::error::GameError;
use crate::types::{
    BatSlot, MAX_OUTS, OutcomeResult, PitchStep, RetiredSide, Side, plate_appearance_delta,
    resolve,
};

/// Everything the scorer (or storage sync) can do to a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Ball,
    Strike,
    Outcome(OutcomeKey),
    /// Answer the current runner prompt
    Runner(RunnerChoice),
    Undo,
    /// Zero the game and send both lineups back to leadoff
    Restart,
    /// Storage reported a team's persisted lineup slot
    SyncBatSlot { side: Side, slot: BatSlot },
}

/// Side effects the host must carry out against external storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Add `delta` to the stats of whoever bats in `slot` for `side`
    RecordStats {
        side: Side,
        slot: BatSlot,
        delta: StatLine,
    },
    /// Persist the team's next lineup slot
    PersistBatSlot { side: Side, slot: BatSlot },
    /// Persist leadoff for both teams
    ResetBatSlots,
}

/// A play that was committed to the game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedPlay {
    pub outcome: OutcomeKey,
    pub result: OutcomeResult,
    /// Team that was batting
    pub side: Side,
    /// Slot that batted
    pub slot: BatSlot,
}

/// What a dispatched action did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Whether the visible state changed
    pub changed: bool,

    pub committed: Option<CommittedPlay>,

    /// Runner prompt now awaiting an answer
    pub prompt: Option<RunnerPrompt>,

    /// Half-inning ended by this action
    pub retired: Option<RetiredSide>,

    /// Storage work, in the order it must be applied
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }
}

impl Scorebook {
    /// Apply an action
    ///
    /// Pitches, outcomes and undo are refused while a runner resolution is
    /// pending. Every accepted pitch or outcome snapshots the state first.
    pub fn dispatch(&mut self, action: Action) -> Result<Transition, GameError> {
        match action {
            Action::SyncBatSlot { side, slot } => {
                self.bat_slots[side.index()] = slot;
                Ok(Transition::unchanged())
            }
            Action::Restart => Ok(self.restart()),
            Action::Runner(choice) => self.answer_runner(choice),
            _ => {
                if let Some(base) = self.pending.as_ref().and_then(|p| p.current_base()) {
                    return Err(GameError::ResolutionPending(base));
                }
                Ok(self.apply_unblocked(action))
            }
        }
    }

    fn apply_unblocked(&mut self, action: Action) -> Transition {
        match action {
            Action::Ball => {
                self.history.push(self.state);
                match self.state.count.ball() {
                    PitchStep::Counted(count) => {
                        self.state.count = count;
                        Transition::changed()
                    }
                    PitchStep::Ends(outcome) => self.apply_outcome(outcome),
                }
            }
            Action::Strike => {
                self.history.push(self.state);
                match self.state.count.strike() {
                    PitchStep::Counted(count) => {
                        self.state.count = count;
                        Transition::changed()
                    }
                    PitchStep::Ends(outcome) => self.apply_outcome(outcome),
                }
            }
            Action::Outcome(outcome) => {
                self.history.push(self.state);
                self.apply_outcome(outcome)
            }
            Action::Undo => self.undo(),
            // Routed by dispatch
            Action::Runner(_) | Action::Restart | Action::SyncBatSlot { .. } => {
                Transition::unchanged()
            }
        }
    }

    /// Resolve an outcome; commit it or queue runner prompts
    fn apply_outcome(&mut self, outcome: OutcomeKey) -> Transition {
        let pre = self.state.runners;
        let result = resolve(outcome, &self.state.play_context());

        match PendingResolution::begin(outcome, pre, result) {
            Some(pending) => {
                let prompt = pending.current_prompt();
                self.pending = Some(pending);
                Transition {
                    changed: true,
                    prompt,
                    ..Transition::default()
                }
            }
            None => self.commit(outcome, result),
        }
    }

    fn answer_runner(&mut self, choice: RunnerChoice) -> Result<Transition, GameError> {
        let pending = self.pending.as_mut().ok_or(GameError::NoPendingResolution)?;

        match pending.answer(choice)? {
            Some(result) => {
                let outcome = pending.outcome;
                self.pending = None;
                Ok(self.commit(outcome, result))
            }
            None => Ok(Transition {
                changed: true,
                prompt: pending.current_prompt(),
                ..Transition::default()
            }),
        }
    }

    /// Write a result into the game state
    fn commit(&mut self, outcome: OutcomeKey, result: OutcomeResult) -> Transition {
        let side = self.state.batting_side();
        let slot = self.bat_slot(side);

        self.state.count = result.count;
        self.state.outs = result.outs;
        self.state.runners = result.runners;
        self.state.add_runs(side, result.runs_scored);

        let mut effects = Vec::new();
        if let Some(delta) = plate_appearance_delta(outcome, result.runs_scored) {
            let next = slot.next();
            self.bat_slots[side.index()] = next;
            effects.push(Effect::RecordStats { side, slot, delta });
            effects.push(Effect::PersistBatSlot { side, slot: next });
        }

        let retired = if self.state.outs >= MAX_OUTS {
            Some(self.state.retire_side())
        } else {
            None
        };

        Transition {
            changed: true,
            committed: Some(CommittedPlay {
                outcome,
                result,
                side,
                slot,
            }),
            prompt: None,
            retired,
            effects,
        }
    }

    fn undo(&mut self) -> Transition {
        match self.history.pop() {
            Some(snapshot) => {
                self.state = snapshot;
                Transition::changed()
            }
            None => Transition::unchanged(),
        }
    }

    fn restart(&mut self) -> Transition {
        *self = Scorebook::new();
        Transition {
            changed: true,
            effects: vec![Effect::ResetBatSlots],
            ..Transition::default()
        }
    }
}
