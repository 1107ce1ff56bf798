use scorebook_game::Side;
use scorebook_protocol::TeamId;

use crate::error::StartError;

/// The two teams in a game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matchup {
    pub home: TeamId,
    pub away: TeamId,
}

impl Matchup {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: TeamId::new(home),
            away: TeamId::new(away),
        }
    }

    /// Build from a team picker where either side may still be unselected
    pub fn from_selection(home: Option<&str>, away: Option<&str>) -> Result<Self, StartError> {
        match (home.map(str::trim), away.map(str::trim)) {
            (Some(home), Some(away)) if !home.is_empty() && !away.is_empty() => {
                Ok(Self::new(home, away))
            }
            _ => Err(StartError::SelectionRequired),
        }
    }

    pub fn team(&self, side: Side) -> &TeamId {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_requires_both_teams() {
        assert_eq!(
            Matchup::from_selection(Some("t1"), None),
            Err(StartError::SelectionRequired)
        );
        assert_eq!(
            Matchup::from_selection(Some(""), Some("t2")),
            Err(StartError::SelectionRequired)
        );

        let matchup = Matchup::from_selection(Some("t1"), Some("t2")).unwrap();
        assert_eq!(matchup.team(Side::Home).as_str(), "t1");
        assert_eq!(matchup.team(Side::Away).as_str(), "t2");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            StartError::SelectionRequired.to_string(),
            "Please select both home and away teams."
        );
    }
}
