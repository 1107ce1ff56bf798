//! Persisted record shapes
//!
//! Keys are camelCase as stored remotely. Every field is optional on the wire;
//! missing counters read as zero.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored team record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_id: Option<String>,
}

/// Stored player record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// Jersey number; stored as either a number or a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,

    #[serde(default)]
    pub stats: StatLine,
}

impl PlayerRecord {
    /// Jersey number as display text (empty if unknown)
    pub fn jersey(&self) -> String {
        match &self.number {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Whether the record says the player belongs to `team_id`
    pub fn plays_for(&self, team_id: &str) -> bool {
        self.team_id.as_deref() == Some(team_id)
    }
}

/// Cumulative batting counters
///
/// Also used as a delta when only some counters change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatLine {
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub sac_flies: u32,
    pub rbis: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
    pub strikeouts: u32,
    pub runs: u32,
}

/// One counter of a [`StatLine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    PlateAppearances,
    AtBats,
    Hits,
    Doubles,
    Triples,
    HomeRuns,
    Walks,
    HitByPitch,
    SacFlies,
    Rbis,
    StolenBases,
    CaughtStealing,
    Strikeouts,
    Runs,
}

impl StatField {
    pub const ALL: [StatField; 14] = [
        StatField::PlateAppearances,
        StatField::AtBats,
        StatField::Hits,
        StatField::Doubles,
        StatField::Triples,
        StatField::HomeRuns,
        StatField::Walks,
        StatField::HitByPitch,
        StatField::SacFlies,
        StatField::Rbis,
        StatField::StolenBases,
        StatField::CaughtStealing,
        StatField::Strikeouts,
        StatField::Runs,
    ];

    /// Key under `Players/{id}/stats`
    pub fn as_key(&self) -> &'static str {
        match self {
            StatField::PlateAppearances => "plateAppearances",
            StatField::AtBats => "atBats",
            StatField::Hits => "hits",
            StatField::Doubles => "doubles",
            StatField::Triples => "triples",
            StatField::HomeRuns => "homeRuns",
            StatField::Walks => "walks",
            StatField::HitByPitch => "hitByPitch",
            StatField::SacFlies => "sacFlies",
            StatField::Rbis => "rbis",
            StatField::StolenBases => "stolenBases",
            StatField::CaughtStealing => "caughtStealing",
            StatField::Strikeouts => "strikeouts",
            StatField::Runs => "runs",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_key() == key)
    }
}

impl StatLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: StatField) -> u32 {
        match field {
            StatField::PlateAppearances => self.plate_appearances,
            StatField::AtBats => self.at_bats,
            StatField::Hits => self.hits,
            StatField::Doubles => self.doubles,
            StatField::Triples => self.triples,
            StatField::HomeRuns => self.home_runs,
            StatField::Walks => self.walks,
            StatField::HitByPitch => self.hit_by_pitch,
            StatField::SacFlies => self.sac_flies,
            StatField::Rbis => self.rbis,
            StatField::StolenBases => self.stolen_bases,
            StatField::CaughtStealing => self.caught_stealing,
            StatField::Strikeouts => self.strikeouts,
            StatField::Runs => self.runs,
        }
    }

    fn slot_mut(&mut self, field: StatField) -> &mut u32 {
        match field {
            StatField::PlateAppearances => &mut self.plate_appearances,
            StatField::AtBats => &mut self.at_bats,
            StatField::Hits => &mut self.hits,
            StatField::Doubles => &mut self.doubles,
            StatField::Triples => &mut self.triples,
            StatField::HomeRuns => &mut self.home_runs,
            StatField::Walks => &mut self.walks,
            StatField::HitByPitch => &mut self.hit_by_pitch,
            StatField::SacFlies => &mut self.sac_flies,
            StatField::Rbis => &mut self.rbis,
            StatField::StolenBases => &mut self.stolen_bases,
            StatField::CaughtStealing => &mut self.caught_stealing,
            StatField::Strikeouts => &mut self.strikeouts,
            StatField::Runs => &mut self.runs,
        }
    }

    pub fn set(&mut self, field: StatField, value: u32) {
        *self.slot_mut(field) = value;
    }

    /// Add to one counter (saturating)
    pub fn add(&mut self, field: StatField, delta: u32) {
        let slot = self.slot_mut(field);
        *slot = slot.saturating_add(delta);
    }

    /// Add every counter of `delta`
    pub fn merge(&mut self, delta: &StatLine) {
        for (field, amount) in delta.nonzero() {
            self.add(field, amount);
        }
    }

    /// Counters with a non-zero value, in field order
    pub fn nonzero(&self) -> Vec<(StatField, u32)> {
        StatField::ALL
            .into_iter()
            .map(|f| (f, self.get(f)))
            .filter(|(_, v)| *v > 0)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nonzero().is_empty()
    }
}

/// Read a persisted `currentBatSlot` value
///
/// Accepts a number or a numeric string in 1..=9; anything else reads as 1.
pub fn parse_bat_slot(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw {
        Some(n) if n.fract() == 0.0 && (1.0..=9.0).contains(&n) => n as u8,
        _ => 1,
    }
}
