//! Live game situation

use super::count::Count;
use super::outcome::PlayContext;
use super::runners::RunnerState;
use super::side::Side;

/// The mutable state of a single live game
///
/// Copies of this value are the undo history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub count: Count,

    /// 0-2 at rest; three outs are normalized away at commit
    pub outs: u8,

    pub runners: RunnerState,
    pub home_runs: u32,
    pub away_runs: u32,

    /// Starts at 1
    pub inning: u32,

    /// Top half: away team bats
    pub is_top: bool,
}

/// A half-inning that just ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetiredSide {
    pub inning: u32,
    pub side: Side,
}

impl GameState {
    /// Top of the first, nothing on the board
    pub fn new() -> Self {
        Self {
            count: Count::new(),
            outs: 0,
            runners: RunnerState::empty(),
            home_runs: 0,
            away_runs: 0,
            inning: 1,
            is_top: true,
        }
    }

    pub fn batting_side(&self) -> Side {
        Side::batting(self.is_top)
    }

    pub fn runs(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_runs,
            Side::Away => self.away_runs,
        }
    }

    pub fn add_runs(&mut self, side: Side, runs: u32) {
        match side {
            Side::Home => self.home_runs += runs,
            Side::Away => self.away_runs += runs,
        }
    }

    /// The pre-play situation outcomes are resolved against
    pub fn play_context(&self) -> PlayContext {
        PlayContext {
            count: self.count,
            outs: self.outs,
            runners: self.runners,
        }
    }

    /// End the current half-inning: clear the count, outs and bases, then
    /// hand the bat to the other team. The inning advances after the bottom half.
    pub fn retire_side(&mut self) -> RetiredSide {
        let retired = RetiredSide {
            inning: self.inning,
            side: self.batting_side(),
        };

        self.count = Count::new();
        self.outs = 0;
        self.runners = RunnerState::empty();

        if self.is_top {
            self.is_top = false;
        } else {
            self.is_top = true;
            self.inning += 1;
        }

        retired
    }

    /// Inning marker such as "▲3" (top) or "▼3" (bottom)
    pub fn inning_label(&self) -> String {
        let arrow = if self.is_top { '▲' } else { '▼' };
        format!("{}{}", arrow, self.inning)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let state = GameState::new();
        assert_eq!(state.inning, 1);
        assert!(state.is_top);
        assert_eq!(state.batting_side(), Side::Away);
        assert_eq!(state.inning_label(), "▲1");
    }

    #[test]
    fn test_add_runs_to_batting_side() {
        let mut state = GameState::new();
        state.add_runs(Side::Away, 2);
        state.add_runs(Side::Home, 1);
        assert_eq!(state.runs(Side::Away), 2);
        assert_eq!(state.runs(Side::Home), 1);
    }

    #[test]
    fn test_retire_top_then_bottom() {
        let mut state = GameState::new();
        state.outs = 3;
        state.runners = RunnerState::loaded();
        state.count = Count {
            balls: 2,
            strikes: 2,
        };

        let retired = state.retire_side();
        assert_eq!(
            retired,
            RetiredSide {
                inning: 1,
                side: Side::Away
            }
        );
        assert!(!state.is_top);
        assert_eq!(state.inning, 1);
        assert_eq!(state.outs, 0);
        assert_eq!(state.count, Count::new());
        assert!(state.runners.is_empty());

        let retired = state.retire_side();
        assert_eq!(retired.side, Side::Home);
        assert!(state.is_top);
        assert_eq!(state.inning, 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_as_plain_fields() {
        let mut state = GameState::new();
        state.add_runs(Side::Away, 2);
        state.runners.set(scorebook_protocol::Base::Second, true);

        let value = serde_json::to_value(state).unwrap();
        assert_eq!(value["away_runs"], 2);
        assert_eq!(value["runners"]["second"], true);
        assert_eq!(value["is_top"], true);
    }
}
