use anyhow::Result;
use async_trait::async_trait;
use scorebook_game::{RetiredSide, RunnerPrompt, Side};
use scorebook_protocol::MenuTarget;
use tokio::sync::broadcast;

use crate::events::{GameView, SessionEvent};

/// Trait for reacting to a scoring session.
///
/// All methods have default no-op implementations, so you only need to
/// implement the events you care about.
///
/// # Example
///
/// ```ignore
/// struct Board;
///
/// #[async_trait]
/// impl SessionHandler for Board {
///     async fn on_state(&mut self, view: &GameView) {
///         println!("{}", view.scoreline());
///     }
/// }
/// ```
#[async_trait]
pub trait SessionHandler: Send {
    /// Called whenever the visible game state changes.
    async fn on_state(&mut self, view: &GameView) {
        let _ = view;
    }

    /// Called when a play stops to ask where a runner went.
    async fn on_prompt(&mut self, prompt: &RunnerPrompt) {
        let _ = prompt;
    }

    async fn on_side_retired(&mut self, retired: RetiredSide) {
        let _ = retired;
    }

    async fn on_batter(&mut self, label: &str) {
        let _ = label;
    }

    async fn on_team_name(&mut self, side: Side, name: &str) {
        let _ = (side, name);
    }

    async fn on_menu(&mut self, target: MenuTarget) {
        let _ = target;
    }

    /// Called when a store write was dropped after retrying.
    async fn on_persistence_failed(&mut self, operation: &str, error: &str) {
        let _ = (operation, error);
    }
}

/// Feed session events to a handler until the session shuts down
pub async fn run_handler<H: SessionHandler>(
    mut events: broadcast::Receiver<SessionEvent>,
    handler: &mut H,
) -> Result<()> {
    loop {
        match events.recv().await {
            Ok(event) => dispatch_event(handler, event).await,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped = skipped, "Handler fell behind, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => return Ok(()),
        }
    }
}

async fn dispatch_event<H: SessionHandler>(handler: &mut H, event: SessionEvent) {
    match event {
        SessionEvent::StateChanged(view) => handler.on_state(&view).await,
        SessionEvent::PromptOpened(prompt) => handler.on_prompt(&prompt).await,
        SessionEvent::SideRetired(retired) => handler.on_side_retired(retired).await,
        SessionEvent::BatterChanged(label) => handler.on_batter(&label).await,
        SessionEvent::TeamNameChanged { side, name } => handler.on_team_name(side, &name).await,
        SessionEvent::OpenMenu(target) => handler.on_menu(target).await,
        SessionEvent::PersistenceFailed { operation, error } => {
            handler.on_persistence_failed(&operation, &error).await
        }
    }
}
