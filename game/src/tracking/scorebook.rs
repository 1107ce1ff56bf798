//! Scorebook - the single owner of a live game's state

use crate::types::{BatSlot, GameState, Side};

use super::history::History;
use super::resolution::{PendingResolution, RunnerPrompt};

/// A game being scored
///
/// Holds the live [`GameState`], its undo history, any runner resolution in
/// progress, and a mirror of each team's current lineup slot. All mutation goes
/// through [`Scorebook::dispatch`].
#[derive(Debug, Clone)]
pub struct Scorebook {
    pub(crate) state: GameState,
    pub(crate) history: History,
    pub(crate) pending: Option<PendingResolution>,

    /// Lineup slot due up for each team (indexed by `Side`)
    pub(crate) bat_slots: [BatSlot; 2],
}

impl Scorebook {
    /// A new game, both teams leading off
    pub fn new() -> Self {
        Self {
            state: GameState::new(),
            history: History::new(),
            pending: None,
            bat_slots: [BatSlot::FIRST; 2],
        }
    }

    /// Start from known lineup positions (e.g. restored from storage)
    pub fn with_bat_slots(home: BatSlot, away: BatSlot) -> Self {
        let mut book = Self::new();
        book.bat_slots[Side::Home.index()] = home;
        book.bat_slots[Side::Away.index()] = away;
        book
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn pending(&self) -> Option<&PendingResolution> {
        self.pending.as_ref()
    }

    /// The runner prompt to display, if a play is being resolved
    pub fn current_prompt(&self) -> Option<RunnerPrompt> {
        self.pending.as_ref().and_then(|p| p.current_prompt())
    }

    pub fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn bat_slot(&self, side: Side) -> BatSlot {
        self.bat_slots[side.index()]
    }

    /// The batting team and its slot due up
    pub fn current_batter(&self) -> (Side, BatSlot) {
        let side = self.state.batting_side();
        (side, self.bat_slot(side))
    }
}

impl Default for Scorebook {
    fn default() -> Self {
        Self::new()
    }
}
