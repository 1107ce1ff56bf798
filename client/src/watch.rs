//! Store subscriptions that feed live data back into a session

use std::sync::Arc;

use scorebook_game::{BatSlot, Side};
use scorebook_protocol::{PlayerId, PlayerRecord, StorePath, TeamId, TeamRecord, parse_bat_slot};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::lineup::{BatterLookup, batter_label};
use crate::store::{Store, Subscription};

/// Current batter identity a label belongs to
pub(crate) type BatterKey = (Side, BatSlot);

/// Store updates routed to the session
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Inbound {
    TeamName { side: Side, name: String },
    /// Stored slot changed
    BatSlot { side: Side, slot: BatSlot },
    /// One of our slot writes finished, successfully or not
    BatSlotSettled { side: Side },
    Batter { key: BatterKey, label: String },
}

async fn open<S: Store>(store: &S, path: &StorePath) -> Option<Subscription> {
    match store.subscribe(path).await {
        Ok(subscription) => Some(subscription),
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Subscription failed");
            None
        }
    }
}

/// Follow a team's display name
pub(crate) fn spawn_team_name_watch<S: Store>(
    store: Arc<S>,
    side: Side,
    team: TeamId,
    tx: mpsc::UnboundedSender<Inbound>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(mut subscription) = open(store.as_ref(), &StorePath::Team(team)).await else {
            return;
        };
        while let Some(value) = subscription.next().await {
            let name = value
                .and_then(|v| serde_json::from_value::<TeamRecord>(v).ok())
                .map(|team| team.name)
                .unwrap_or_default();
            if tx.send(Inbound::TeamName { side, name }).is_err() {
                break;
            }
        }
    })
}

/// A team's persisted lineup slot, as seen through a subscription
///
/// Only values that differ from the last one seen are reported. Writes
/// elsewhere under the team notify this path too; those repeat the stored
/// slot and are dropped here.
pub(crate) struct BatSlotFeed {
    subscription: Option<Subscription>,
    last: BatSlot,
}

impl BatSlotFeed {
    /// Subscribe and take the first value as the starting slot
    pub(crate) async fn open<S: Store>(store: &S, team: &TeamId) -> Self {
        let path = StorePath::CurrentBatSlot(team.clone());
        let Some(mut subscription) = open(store, &path).await else {
            return Self {
                subscription: None,
                last: BatSlot::FIRST,
            };
        };

        let last = match subscription.next().await {
            Some(value) => parse_slot(value.as_ref()),
            None => BatSlot::FIRST,
        };
        Self {
            subscription: Some(subscription),
            last,
        }
    }

    /// Slot the store held when last seen
    pub(crate) fn last(&self) -> BatSlot {
        self.last
    }

    /// Wait for the stored slot to change
    ///
    /// Returns `None` once the subscription has ended.
    pub(crate) async fn changed(&mut self) -> Option<BatSlot> {
        let Self { subscription, last } = self;
        let updates = subscription.as_mut()?;

        while let Some(value) = updates.next().await {
            if let Some(slot) = accept(last, value.as_ref()) {
                return Some(slot);
            }
        }

        *subscription = None;
        None
    }

    /// Changes that have already arrived
    pub(crate) fn drain_ready(&mut self) -> Vec<BatSlot> {
        let Self { subscription, last } = self;
        let mut changes = Vec::new();
        if let Some(updates) = subscription.as_mut() {
            while let Some(value) = updates.try_next() {
                changes.extend(accept(last, value.as_ref()));
            }
        }
        changes
    }
}

fn parse_slot(value: Option<&Value>) -> BatSlot {
    BatSlot::new_or_first(parse_bat_slot(value))
}

fn accept(last: &mut BatSlot, value: Option<&Value>) -> Option<BatSlot> {
    let slot = parse_slot(value);
    if slot == *last {
        return None;
    }
    *last = slot;
    Some(slot)
}

/// Follow whoever is assigned to one lineup slot
///
/// The slot's assignment and the assigned player's record are both live.
/// When the assignment changes the old player subscription is dropped
/// before the new one is opened.
pub(crate) fn spawn_batter_watch<S: Store>(
    store: Arc<S>,
    key: BatterKey,
    team: TeamId,
    tx: mpsc::UnboundedSender<Inbound>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let slot = key.1;
        let Some(mut assignment) =
            open(store.as_ref(), &StorePath::LineupSlot(team, slot.get())).await
        else {
            return;
        };
        let mut player: Option<Subscription> = None;

        loop {
            let label = tokio::select! {
                update = assignment.next() => {
                    let Some(value) = update else { break };
                    player = None;
                    match player_id(value.as_ref()) {
                        None => batter_label(slot, BatterLookup::Empty),
                        Some(id) => {
                            player = open(store.as_ref(), &StorePath::Player(id)).await;
                            continue;
                        }
                    }
                }
                update = next_or_pending(&mut player) => match update {
                    Some(value) => {
                        let record = value.and_then(|v| serde_json::from_value::<PlayerRecord>(v).ok());
                        match &record {
                            Some(record) => batter_label(slot, BatterLookup::Found(record)),
                            None => batter_label(slot, BatterLookup::Missing),
                        }
                    }
                    None => {
                        player = None;
                        continue;
                    }
                },
            };

            if tx.send(Inbound::Batter { key, label }).is_err() {
                break;
            }
        }
    })
}

fn player_id(value: Option<&Value>) -> Option<PlayerId> {
    value
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(PlayerId::new)
}

async fn next_or_pending(subscription: &mut Option<Subscription>) -> Option<Option<Value>> {
    match subscription {
        Some(subscription) => subscription.next().await,
        None => std::future::pending().await,
    }
}
