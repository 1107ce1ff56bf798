//! Play vocabulary shared by the engine, the stored records and the command language

use serde::{Deserialize, Serialize};

/// A base a runner can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Base {
    First,
    Second,
    Third,
}

impl Base {
    /// All bases in resolution order
    pub const ALL: [Base; 3] = [Base::First, Base::Second, Base::Third];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first" | "1st" | "1" => Some(Base::First),
            "second" | "2nd" | "2" => Some(Base::Second),
            "third" | "3rd" | "3" => Some(Base::Third),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Base::First => "first",
            Base::Second => "second",
            Base::Third => "third",
        }
    }

    /// Short label ("1st", "2nd", "3rd")
    pub fn label(&self) -> &'static str {
        match self {
            Base::First => "1st",
            Base::Second => "2nd",
            Base::Third => "3rd",
        }
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plate appearance outcomes the scorer can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKey {
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    Strikeout,
    Groundout,
    Flyout,
    Foul,
}

impl OutcomeKey {
    /// Catalog order, as presented in the outcome menu
    pub const ALL: [OutcomeKey; 9] = [
        OutcomeKey::Single,
        OutcomeKey::Double,
        OutcomeKey::Triple,
        OutcomeKey::HomeRun,
        OutcomeKey::Walk,
        OutcomeKey::Strikeout,
        OutcomeKey::Groundout,
        OutcomeKey::Flyout,
        OutcomeKey::Foul,
    ];

    /// Parse from the stored key ("single", "home_run", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(OutcomeKey::Single),
            "double" => Some(OutcomeKey::Double),
            "triple" => Some(OutcomeKey::Triple),
            "home_run" | "homerun" | "hr" => Some(OutcomeKey::HomeRun),
            "walk" | "bb" => Some(OutcomeKey::Walk),
            "strikeout" | "k" => Some(OutcomeKey::Strikeout),
            "groundout" => Some(OutcomeKey::Groundout),
            "flyout" => Some(OutcomeKey::Flyout),
            "foul" => Some(OutcomeKey::Foul),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKey::Single => "single",
            OutcomeKey::Double => "double",
            OutcomeKey::Triple => "triple",
            OutcomeKey::HomeRun => "home_run",
            OutcomeKey::Walk => "walk",
            OutcomeKey::Strikeout => "strikeout",
            OutcomeKey::Groundout => "groundout",
            OutcomeKey::Flyout => "flyout",
            OutcomeKey::Foul => "foul",
        }
    }

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeKey::Single => "Single",
            OutcomeKey::Double => "Double",
            OutcomeKey::Triple => "Triple",
            OutcomeKey::HomeRun => "Home Run",
            OutcomeKey::Walk => "Walk",
            OutcomeKey::Strikeout => "Strikeout",
            OutcomeKey::Groundout => "Ground Out",
            OutcomeKey::Flyout => "Fly Out",
            OutcomeKey::Foul => "Foul",
        }
    }

    /// Whether this outcome ends the plate appearance (everything but a foul)
    pub fn is_final(&self) -> bool {
        !matches!(self, OutcomeKey::Foul)
    }

    /// Whether the plate appearance counts as an official at-bat
    pub fn is_at_bat(&self) -> bool {
        self.is_final() && !matches!(self, OutcomeKey::Walk)
    }

    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            OutcomeKey::Single | OutcomeKey::Double | OutcomeKey::Triple | OutcomeKey::HomeRun
        )
    }

    /// Whether the outcome records an out for the batter
    pub fn is_out(&self) -> bool {
        matches!(
            self,
            OutcomeKey::Strikeout | OutcomeKey::Groundout | OutcomeKey::Flyout
        )
    }
}

impl std::fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where the scorer says a prompted runner ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerChoice {
    ToSecond,
    ToThird,
    Score,
    Held,
}

impl RunnerChoice {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "to2" | "to2nd" | "second" => Some(RunnerChoice::ToSecond),
            "to3" | "to3rd" | "third" => Some(RunnerChoice::ToThird),
            "score" | "scored" => Some(RunnerChoice::Score),
            "held" | "hold" => Some(RunnerChoice::Held),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunnerChoice::ToSecond => "to2",
            RunnerChoice::ToThird => "to3",
            RunnerChoice::Score => "score",
            RunnerChoice::Held => "held",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunnerChoice::ToSecond => "To 2nd",
            RunnerChoice::ToThird => "To 3rd",
            RunnerChoice::Score => "Scored",
            RunnerChoice::Held => "Held at base",
        }
    }
}

impl std::fmt::Display for RunnerChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
