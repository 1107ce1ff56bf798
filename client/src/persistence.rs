//! Background worker that applies engine effects to the store
//!
//! Effects are applied one at a time, in the order the engine committed
//! them. Failures are retried with backoff, then logged and dropped; the
//! game state is never rolled back.
//!
//! The worker also owns both teams' bat slot subscriptions. Slot changes
//! and write completions reach the session through one channel, so the
//! session always sees the echo of a write before hearing it settled.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use scorebook_game::{BatSlot, Effect, Side, StatLine};
use scorebook_protocol::{StorePath, TeamId};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::RetryPolicy;
use crate::events::SessionEvent;
use crate::lineup::lineup_player;
use crate::matchup::Matchup;
use crate::store::Store;
use crate::watch::{BatSlotFeed, Inbound};

pub(crate) enum Job {
    Apply(Effect),
    /// Answered once every earlier job has been handled
    Flush(oneshot::Sender<()>),
}

pub(crate) struct PersistenceWorker<S: Store> {
    store: Arc<S>,
    matchup: Matchup,
    retry: RetryPolicy,
    events: broadcast::Sender<SessionEvent>,
    inbound: mpsc::UnboundedSender<Inbound>,
    home_slot: BatSlotFeed,
    away_slot: BatSlotFeed,
}

impl<S: Store> PersistenceWorker<S> {
    /// Opens both bat slot feeds; their first values are the starting slots
    pub(crate) async fn new(
        store: Arc<S>,
        matchup: Matchup,
        retry: RetryPolicy,
        events: broadcast::Sender<SessionEvent>,
        inbound: mpsc::UnboundedSender<Inbound>,
    ) -> Self {
        let home_slot = BatSlotFeed::open(store.as_ref(), &matchup.home).await;
        let away_slot = BatSlotFeed::open(store.as_ref(), &matchup.away).await;
        Self {
            store,
            matchup,
            retry,
            events,
            inbound,
            home_slot,
            away_slot,
        }
    }

    /// Stored slot for `side` as of the last notification
    pub(crate) fn stored_slot(&self, side: Side) -> BatSlot {
        match side {
            Side::Home => self.home_slot.last(),
            Side::Away => self.away_slot.last(),
        }
    }

    fn feed(&mut self, side: Side) -> &mut BatSlotFeed {
        match side {
            Side::Home => &mut self.home_slot,
            Side::Away => &mut self.away_slot,
        }
    }

    pub(crate) fn spawn(self) -> (mpsc::UnboundedSender<Job>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (tx, task)
    }

    async fn run(mut self, mut jobs: mpsc::UnboundedReceiver<Job>) {
        loop {
            tokio::select! {
                biased;
                Some(slot) = self.home_slot.changed() => self.forward(Side::Home, slot),
                Some(slot) = self.away_slot.changed() => self.forward(Side::Away, slot),
                job = jobs.recv() => match job {
                    Some(Job::Apply(effect)) => self.apply(&effect).await,
                    Some(Job::Flush(done)) => {
                        let _ = done.send(());
                    }
                    None => break,
                },
            }
        }
        tracing::debug!("Persistence worker stopped");
    }

    fn forward(&self, side: Side, slot: BatSlot) {
        let _ = self.inbound.send(Inbound::BatSlot { side, slot });
    }

    async fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::RecordStats { side, slot, delta } => {
                let result = self.record_stats(*side, *slot, delta).await;
                self.report("record stats", result);
            }
            Effect::PersistBatSlot { side, slot } => self.persist_bat_slot(*side, *slot).await,
            Effect::ResetBatSlots => {
                for side in Side::BOTH {
                    self.persist_bat_slot(side, BatSlot::FIRST).await;
                }
            }
        }
    }

    fn report(&self, operation: &str, result: Result<()>) {
        if let Err(e) = result {
            tracing::error!(operation = operation, error = %e, "Store update dropped");
            let _ = self.events.send(SessionEvent::PersistenceFailed {
                operation: operation.to_string(),
                error: format!("{:#}", e),
            });
        }
    }

    /// Write one slot, pass on what the store reported, then tell the
    /// session the write is done
    async fn persist_bat_slot(&mut self, side: Side, slot: BatSlot) {
        match self.write_bat_slot(side, slot).await {
            Ok(()) => {
                for changed in self.feed(side).drain_ready() {
                    self.forward(side, changed);
                }
            }
            Err(e) => self.report("persist bat slot", Err(e)),
        }
        let _ = self.inbound.send(Inbound::BatSlotSettled { side });
    }

    fn team(&self, side: Side) -> &TeamId {
        self.matchup.team(side)
    }

    async fn record_stats(&self, side: Side, slot: BatSlot, delta: &StatLine) -> Result<()> {
        let lineup_path = StorePath::Lineup(self.team(side).clone());
        let lineup = self
            .with_retry("lineup lookup", || self.store.read_once(&lineup_path))
            .await?;

        let Some(player) = lineup_player(lineup.as_ref(), slot) else {
            tracing::debug!(
                team = %self.team(side),
                slot = slot.get(),
                "No player in slot, stats not recorded"
            );
            return Ok(());
        };

        let increments: Vec<(String, i64)> = delta
            .nonzero()
            .into_iter()
            .map(|(field, value)| (field.as_key().to_string(), i64::from(value)))
            .collect();
        if increments.is_empty() {
            return Ok(());
        }

        let stats_path = StorePath::PlayerStats(player);
        self.with_retry("stat increment", || {
            self.store.increment_fields(&stats_path, &increments)
        })
        .await
    }

    async fn write_bat_slot(&self, side: Side, slot: BatSlot) -> Result<()> {
        let path = StorePath::CurrentBatSlot(self.team(side).clone());
        self.with_retry("bat slot write", || {
            self.store.write_atomic(&path, Value::from(slot.get()))
        })
        .await
    }

    /// Run `attempt` until it succeeds or the retry policy is exhausted
    async fn with_retry<T, F, Fut>(&self, what: &str, attempt: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut tries = 1;

        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) if tries >= max_attempts => {
                    return Err(e).with_context(|| {
                        format!("{} failed after {} attempts", what, max_attempts)
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        what = what,
                        attempt = tries,
                        max_attempts = max_attempts,
                        error = %e,
                        "Store call failed, retrying"
                    );
                    tokio::time::sleep(self.retry.delay_after(tries)).await;
                    tries += 1;
                }
            }
        }
    }
}
