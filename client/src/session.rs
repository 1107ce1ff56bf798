//! The running scoring session
//!
//! A session owns the [`Scorebook`] inside a single task. Scorer input,
//! store updates and shutdown all arrive as messages, so the engine never
//! needs a lock. Store writes are handed to the persistence worker and
//! never block the reply to the scorer.

use std::sync::Arc;

use anyhow::Result;
use scorebook_game::{
    Action, Effect, GameError, OutcomeInfo, OutcomeKey, RunnerChoice, Scorebook, Side,
    Transition, catalog,
};
use scorebook_protocol::{MenuTarget, ScorerCommand};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::events::{GameView, SessionEvent};
use crate::matchup::Matchup;
use crate::persistence::{Job, PersistenceWorker};
use crate::store::Store;
use crate::watch::{BatterKey, Inbound, spawn_batter_watch, spawn_team_name_watch};

enum Command {
    Act(Action, oneshot::Sender<Result<GameView, GameError>>),
    OpenMenu(MenuTarget),
    View(oneshot::Sender<GameView>),
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Entry point for scoring a game
pub struct GameSession;

impl GameSession {
    /// Start scoring `matchup`, resuming each team's persisted lineup slot
    pub async fn start<S: Store>(
        store: Arc<S>,
        matchup: Matchup,
        config: SessionConfig,
    ) -> Result<SessionHandle> {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        // The first stored slots are read here, before any command is taken
        let worker = PersistenceWorker::new(
            store.clone(),
            matchup.clone(),
            config.retry.clone(),
            events.clone(),
            inbound_tx.clone(),
        )
        .await;
        let home = worker.stored_slot(Side::Home);
        let away = worker.stored_slot(Side::Away);
        let (jobs, worker) = worker.spawn();

        let watchers = Side::BOTH
            .into_iter()
            .map(|side| {
                spawn_team_name_watch(
                    store.clone(),
                    side,
                    matchup.team(side).clone(),
                    inbound_tx.clone(),
                )
            })
            .collect();

        let mut actor = SessionActor {
            store,
            matchup,
            config,
            book: Scorebook::with_bat_slots(home, away),
            names: [String::new(), String::new()],
            batter: String::new(),
            slot_writes: [0, 0],
            events: events.clone(),
            jobs,
            worker,
            inbound_tx,
            watchers,
            batter_watch: None,
        };
        actor.refresh_batter_watch();

        let (commands, commands_rx) = mpsc::unbounded_channel();
        tokio::spawn(actor.run(commands_rx, inbound_rx));

        tracing::debug!(home = home.get(), away = away.get(), "Scoring session started");
        Ok(SessionHandle { commands, events })
    }
}

/// Cloneable handle to a running session
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::Closed)
    }

    async fn act(&self, action: Action) -> Result<GameView, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Act(action, tx))?;
        let result = rx.await.map_err(|_| SessionError::Closed)?;
        Ok(result?)
    }

    pub async fn ball(&self) -> Result<GameView, SessionError> {
        self.act(Action::Ball).await
    }

    pub async fn strike(&self) -> Result<GameView, SessionError> {
        self.act(Action::Strike).await
    }

    pub async fn outcome(&self, key: OutcomeKey) -> Result<GameView, SessionError> {
        self.act(Action::Outcome(key)).await
    }

    /// Answer the open runner prompt
    pub async fn answer(&self, choice: RunnerChoice) -> Result<GameView, SessionError> {
        self.act(Action::Runner(choice)).await
    }

    pub async fn undo(&self) -> Result<GameView, SessionError> {
        self.act(Action::Undo).await
    }

    /// Fresh game, both lineups back to leadoff
    pub async fn restart(&self) -> Result<GameView, SessionError> {
        self.act(Action::Restart).await
    }

    pub fn open_menu(&self, target: MenuTarget) -> Result<(), SessionError> {
        self.send(Command::OpenMenu(target))
    }

    pub async fn view(&self) -> Result<GameView, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::View(tx))?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Outcome buttons in display order
    pub fn catalog(&self) -> Vec<OutcomeInfo> {
        catalog()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Wait until every store write issued so far has been attempted
    pub async fn flush(&self) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Flush(tx))?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Stop the session after draining pending store writes
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown(tx))?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Run a parsed scorer command
    pub async fn execute(&self, command: ScorerCommand) -> Result<GameView, SessionError> {
        match command {
            ScorerCommand::Ball => self.ball().await,
            ScorerCommand::Strike => self.strike().await,
            ScorerCommand::Outcome(key) => self.outcome(key).await,
            ScorerCommand::Runner(choice) => self.answer(choice).await,
            ScorerCommand::Undo => self.undo().await,
            ScorerCommand::Restart => self.restart().await,
            ScorerCommand::Menu(target) => {
                self.open_menu(target)?;
                self.view().await
            }
            ScorerCommand::Status => self.view().await,
        }
    }
}

struct BatterWatch {
    key: BatterKey,
    task: JoinHandle<()>,
}

struct SessionActor<S: Store> {
    store: Arc<S>,
    matchup: Matchup,
    config: SessionConfig,
    book: Scorebook,
    names: [String; 2],
    batter: String,
    /// Slot writes queued by this session and not yet settled, per side
    slot_writes: [usize; 2],
    events: broadcast::Sender<SessionEvent>,
    jobs: mpsc::UnboundedSender<Job>,
    worker: JoinHandle<()>,
    inbound_tx: mpsc::UnboundedSender<Inbound>,
    watchers: Vec<JoinHandle<()>>,
    batter_watch: Option<BatterWatch>,
}

impl<S: Store> SessionActor<S> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut inbound: mpsc::UnboundedReceiver<Inbound>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle_command(command).await {
                            return;
                        }
                    }
                    None => {
                        self.stop().await;
                        return;
                    }
                },
                Some(message) = inbound.recv() => self.handle_inbound(message),
            }
        }
    }

    /// Returns `false` once the session has stopped
    async fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Act(action, reply) => {
                let result = self.book.dispatch(action);
                let result = match result {
                    Ok(transition) => Ok(self.publish(transition).await),
                    Err(e) => {
                        tracing::debug!(action = ?action, error = %e, "Action rejected");
                        Err(e)
                    }
                };
                let _ = reply.send(result);
            }
            Command::OpenMenu(target) => self.emit(SessionEvent::OpenMenu(target)),
            Command::View(reply) => {
                let _ = reply.send(self.view());
            }
            Command::Flush(done) => {
                if let Err(mpsc::error::SendError(Job::Flush(done))) =
                    self.jobs.send(Job::Flush(done))
                {
                    let _ = done.send(());
                }
            }
            Command::Shutdown(done) => {
                self.stop().await;
                let _ = done.send(());
                return false;
            }
        }
        true
    }

    /// Queue effects and broadcast what changed
    async fn publish(&mut self, transition: Transition) -> GameView {
        for effect in transition.effects {
            self.track_slot_write(&effect);
            if self.jobs.send(Job::Apply(effect)).is_err() {
                tracing::error!("Persistence worker gone, store update dropped");
            }
        }

        if let Some(prompt) = transition.prompt {
            self.emit(SessionEvent::PromptOpened(prompt));
        }

        if let Some(retired) = transition.retired {
            tracing::debug!(inning = retired.inning, side = retired.side.as_str(), "Side retired");
            self.emit(SessionEvent::SideRetired(retired));
            tokio::time::sleep(self.config.settle_delay).await;
        }

        self.refresh_batter_watch();

        let view = self.view();
        if transition.changed {
            self.emit(SessionEvent::StateChanged(view.clone()));
        }
        view
    }

    fn track_slot_write(&mut self, effect: &Effect) {
        match effect {
            Effect::PersistBatSlot { side, .. } => self.slot_writes[side.index()] += 1,
            Effect::ResetBatSlots => {
                for pending in &mut self.slot_writes {
                    *pending += 1;
                }
            }
            Effect::RecordStats { .. } => {}
        }
    }

    fn handle_inbound(&mut self, message: Inbound) {
        match message {
            Inbound::TeamName { side, name } => {
                self.names[side.index()] = name.clone();
                self.emit(SessionEvent::TeamNameChanged { side, name });
            }
            Inbound::BatSlotSettled { side } => {
                let pending = &mut self.slot_writes[side.index()];
                *pending = pending.saturating_sub(1);
            }
            Inbound::BatSlot { side, slot } => {
                // A queued write of ours lands after this and wins
                if self.slot_writes[side.index()] > 0 {
                    tracing::trace!(side = side.as_str(), slot = slot.get(), "Slot update superseded");
                    return;
                }

                if self.book.bat_slot(side) == slot {
                    return;
                }
                match self.book.dispatch(Action::SyncBatSlot { side, slot }) {
                    Ok(_) => {
                        tracing::debug!(side = side.as_str(), slot = slot.get(), "Bat slot synced");
                        self.refresh_batter_watch();
                        let view = self.view();
                        self.emit(SessionEvent::StateChanged(view));
                    }
                    Err(e) => tracing::warn!(error = %e, "Bat slot sync rejected"),
                }
            }
            Inbound::Batter { key, label } => {
                if self.batter_watch.as_ref().map(|w| w.key) != Some(key) {
                    return;
                }
                self.batter = label.clone();
                self.emit(SessionEvent::BatterChanged(label));
            }
        }
    }

    /// Follow the current batter, replacing the old watch if the batter moved
    fn refresh_batter_watch(&mut self) {
        let key = self.book.current_batter();
        if self.batter_watch.as_ref().map(|w| w.key) == Some(key) {
            return;
        }

        if let Some(old) = self.batter_watch.take() {
            old.task.abort();
        }

        let team = self.matchup.team(key.0).clone();
        let task = spawn_batter_watch(self.store.clone(), key, team, self.inbound_tx.clone());
        self.batter_watch = Some(BatterWatch { key, task });
    }

    fn team_label(&self, side: Side) -> String {
        let name = &self.names[side.index()];
        if name.is_empty() {
            side.label().to_string()
        } else {
            name.clone()
        }
    }

    fn view(&self) -> GameView {
        GameView {
            state: *self.book.state(),
            prompt: self.book.current_prompt(),
            home_slot: self.book.bat_slot(Side::Home),
            away_slot: self.book.bat_slot(Side::Away),
            home_name: self.team_label(Side::Home),
            away_name: self.team_label(Side::Away),
            batter: self.batter.clone(),
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    async fn stop(&mut self) {
        for watcher in self.watchers.drain(..) {
            watcher.abort();
        }
        if let Some(watch) = self.batter_watch.take() {
            watch.task.abort();
        }

        let (tx, rx) = oneshot::channel();
        if self.jobs.send(Job::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
        self.worker.abort();
        tracing::debug!("Scoring session stopped");
    }
}
