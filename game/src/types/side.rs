//! Teams and batting order position

/// Which team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    /// The team at bat: away in the top half, home in the bottom half
    pub fn batting(is_top: bool) -> Self {
        if is_top { Side::Away } else { Side::Home }
    }

    pub fn other(&self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// Position in per-side arrays: home 0, away 1
    pub fn index(&self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }

    /// Placeholder name when the team name is unknown
    pub fn label(&self) -> &'static str {
        match self {
            Side::Home => "Home",
            Side::Away => "Away",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Number of batting order positions
pub const LINEUP_SIZE: u8 = 9;

/// A batting order position, always within 1..=9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatSlot(u8);

impl BatSlot {
    /// Leadoff
    pub const FIRST: BatSlot = BatSlot(1);

    pub fn new(slot: u8) -> Option<Self> {
        (1..=LINEUP_SIZE).contains(&slot).then_some(BatSlot(slot))
    }

    /// Like [`BatSlot::new`], but out-of-range values fall back to leadoff
    pub fn new_or_first(slot: u8) -> Self {
        Self::new(slot).unwrap_or(Self::FIRST)
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// The next batter, wrapping from 9 back to 1
    pub fn next(&self) -> Self {
        if self.0 >= LINEUP_SIZE {
            Self::FIRST
        } else {
            BatSlot(self.0 + 1)
        }
    }

    /// All nine slots in order
    pub fn all() -> impl Iterator<Item = BatSlot> {
        (1..=LINEUP_SIZE).map(BatSlot)
    }
}

impl Default for BatSlot {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for BatSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
