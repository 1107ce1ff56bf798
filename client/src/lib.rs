//! Async scoring session for scorebook
//!
//! Wraps the [`scorebook_game`] engine in a task that talks to a
//! [`Store`]: stats and lineup positions are written in the background,
//! team names and the current batter are followed live, and every change
//! is broadcast as a [`SessionEvent`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use scorebook_client::{GameSession, Matchup, MemoryStore, OutcomeKey, SessionConfig};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let matchup = Matchup::from_selection(Some("owls"), Some("bats"))?;
//! let session = GameSession::start(store, matchup, SessionConfig::default()).await?;
//!
//! session.ball().await?;
//! let view = session.outcome(OutcomeKey::Double).await?;
//! println!("{}", view.scoreline());
//!
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod events;
mod handler;
pub mod lineup;
mod matchup;
mod memory;
mod persistence;
mod session;
mod store;
mod watch;

pub use config::{RetryPolicy, SessionConfig};
pub use error::{SessionError, StartError};
pub use events::{GameView, SessionEvent};
pub use handler::{SessionHandler, run_handler};
pub use lineup::{BatterLookup, LineupEntry, batter_label, load_lineup};
pub use matchup::Matchup;
pub use memory::MemoryStore;
pub use session::{GameSession, SessionHandle};
pub use store::{Store, Subscription, read_record};

pub use scorebook_game::{
    Base, BatSlot, GameError, GameState, OutcomeInfo, OutcomeKey, RetiredSide, RunnerChoice,
    RunnerPrompt, Side,
};
pub use scorebook_protocol::{
    MenuTarget, PlayerId, PlayerRecord, ScorerCommand, StorePath, TeamId, TeamRecord,
    parse_command, parse_script,
};
