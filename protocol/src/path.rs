//! Logical paths into the remote key-value store
//!
//! The store is a tree addressed by slash-separated segments:
//!
//! ```text
//! Teams/{teamId}                    team record (name, leagueId)
//! Teams/{teamId}/lineup/{slot}      player id batting in that slot
//! Teams/{teamId}/currentBatSlot     persisted lineup position (1-9)
//! Players/{playerId}                player record (name, position, number, stats)
//! Players/{playerId}/stats          cumulative counters
//! ```

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Team key in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Player key in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A location in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorePath {
    /// All teams
    Teams,
    /// One team record
    Team(TeamId),
    /// The whole batting order of a team
    Lineup(TeamId),
    /// A single batting order slot (1-9)
    LineupSlot(TeamId, u8),
    /// The team's persisted current batter slot
    CurrentBatSlot(TeamId),
    /// One player record
    Player(PlayerId),
    /// A player's cumulative counters
    PlayerStats(PlayerId),
}

impl StorePath {
    /// Path segments from the root
    pub fn segments(&self) -> Vec<String> {
        match self {
            Self::Teams => vec!["Teams".into()],
            Self::Team(team) => vec!["Teams".into(), team.0.clone()],
            Self::Lineup(team) => vec!["Teams".into(), team.0.clone(), "lineup".into()],
            Self::LineupSlot(team, slot) => vec![
                "Teams".into(),
                team.0.clone(),
                "lineup".into(),
                slot.to_string(),
            ],
            Self::CurrentBatSlot(team) => {
                vec!["Teams".into(), team.0.clone(), "currentBatSlot".into()]
            }
            Self::Player(player) => vec!["Players".into(), player.0.clone()],
            Self::PlayerStats(player) => {
                vec!["Players".into(), player.0.clone(), "stats".into()]
            }
        }
    }

    /// Parse a slash-separated path such as `Teams/abc/lineup/3`
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = s.trim_matches('/').split('/').collect();

        let invalid = || ParseError::InvalidPath(s.to_string());

        match parts.as_slice() {
            ["Teams"] => Ok(Self::Teams),
            ["Teams", team] if !team.is_empty() => Ok(Self::Team(TeamId::new(*team))),
            ["Teams", team, "lineup"] => Ok(Self::Lineup(TeamId::new(*team))),
            ["Teams", team, "lineup", slot] => {
                let slot: u8 = slot.parse().map_err(|_| invalid())?;
                Ok(Self::LineupSlot(TeamId::new(*team), slot))
            }
            ["Teams", team, "currentBatSlot"] => Ok(Self::CurrentBatSlot(TeamId::new(*team))),
            ["Players", player] if !player.is_empty() => {
                Ok(Self::Player(PlayerId::new(*player)))
            }
            ["Players", player, "stats"] => Ok(Self::PlayerStats(PlayerId::new(*player))),
            _ => Err(invalid()),
        }
    }

    /// Whether `other` lies at or below this path
    pub fn contains(&self, other: &StorePath) -> bool {
        let mine = self.segments();
        let theirs = other.segments();
        theirs.len() >= mine.len() && theirs[..mine.len()] == mine[..]
    }

    /// Whether a change at one path can be observed at the other
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl std::fmt::Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments().join("/"))
    }
}
