//! Batting order lookups

use anyhow::Result;
use scorebook_game::{BatSlot, LINEUP_SIZE};
use scorebook_protocol::{PlayerId, PlayerRecord, StorePath, TeamId};
use serde_json::Value;

use crate::store::{Store, read_record};

/// One row of a team's stats sheet
#[derive(Debug, Clone, PartialEq)]
pub struct LineupEntry {
    pub slot: BatSlot,
    pub player_id: Option<PlayerId>,
    /// Present only when the player exists and is on this team
    pub player: Option<PlayerRecord>,
}

/// What is known about the player in a slot
#[derive(Debug, Clone, Copy)]
pub enum BatterLookup<'a> {
    /// Nobody assigned to the slot
    Empty,
    /// Assigned id has no player record
    Missing,
    Found(&'a PlayerRecord),
}

/// "3. Jane Doe, SS #7", "3. (empty)" or "3. Unknown"
pub fn batter_label(slot: BatSlot, lookup: BatterLookup<'_>) -> String {
    match lookup {
        BatterLookup::Empty => format!("{}. (empty)", slot),
        BatterLookup::Missing => format!("{}. Unknown", slot),
        BatterLookup::Found(player) => format!(
            "{}. {}, {} #{}",
            slot,
            player.name,
            player.position.as_deref().unwrap_or(""),
            player.jersey()
        ),
    }
}

/// Player id stored in a lineup, whether the lineup is an object keyed by
/// slot or an array indexed by it
pub fn lineup_player(lineup: Option<&Value>, slot: BatSlot) -> Option<PlayerId> {
    let entry = match lineup? {
        Value::Object(map) => map.get(&slot.to_string()),
        Value::Array(items) => items.get(usize::from(slot.get())),
        _ => None,
    };
    entry
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(PlayerId::new)
}

/// The team's nine lineup slots with their player records
pub async fn load_lineup<S: Store + ?Sized>(store: &S, team: &TeamId) -> Result<Vec<LineupEntry>> {
    let lineup = store.read_once(&StorePath::Lineup(team.clone())).await?;
    let mut entries = Vec::with_capacity(LINEUP_SIZE as usize);

    for slot in BatSlot::all() {
        let player_id = lineup_player(lineup.as_ref(), slot);
        let player = match &player_id {
            Some(id) => read_record::<_, PlayerRecord>(store, &StorePath::Player(id.clone()))
                .await?
                .filter(|player| player.plays_for(team.as_str())),
            None => None,
        };
        entries.push(LineupEntry {
            slot,
            player_id,
            player,
        });
    }

    Ok(entries)
}
