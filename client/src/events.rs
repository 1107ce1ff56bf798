use scorebook_game::{BatSlot, GameState, RetiredSide, RunnerPrompt, Side};
use scorebook_protocol::MenuTarget;
use serde::Serialize;

/// Everything a scorer screen needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub state: GameState,
    /// Runner prompt awaiting an answer
    pub prompt: Option<RunnerPrompt>,
    pub home_slot: BatSlot,
    pub away_slot: BatSlot,
    pub home_name: String,
    pub away_name: String,
    /// e.g. "3. Jane Doe, SS #7"
    pub batter: String,
}

impl GameView {
    pub fn team_name(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_name,
            Side::Away => &self.away_name,
        }
    }

    pub fn bat_slot(&self, side: Side) -> BatSlot {
        match side {
            Side::Home => self.home_slot,
            Side::Away => self.away_slot,
        }
    }

    /// One-line scoreboard
    pub fn scoreline(&self) -> String {
        let state = &self.state;
        format!(
            "{} {} - {} {} | {} | {} | {} out | bases {}",
            self.away_name,
            state.away_runs,
            self.home_name,
            state.home_runs,
            state.inning_label(),
            state.count,
            state.outs,
            state.runners.diagram_key(),
        )
    }
}

/// Broadcast by a running session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged(GameView),
    PromptOpened(RunnerPrompt),
    SideRetired(RetiredSide),
    BatterChanged(String),
    TeamNameChanged { side: Side, name: String },
    /// Pass-through request to show a host menu
    OpenMenu(MenuTarget),
    /// A store write gave up after its retries; the game state is unaffected
    PersistenceFailed { operation: String, error: String },
}
