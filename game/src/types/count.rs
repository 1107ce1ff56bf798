//! Balls and strikes within a plate appearance

use scorebook_protocol::OutcomeKey;

/// Highest ball count that can be displayed (ball four ends the plate appearance)
pub const MAX_BALLS: u8 = 3;

/// Highest strike count that can be displayed (strike three ends the plate appearance)
pub const MAX_STRIKES: u8 = 2;

/// The current count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
}

/// What a single pitch does to the count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchStep {
    /// The plate appearance continues with this count
    Counted(Count),
    /// The pitch ends the plate appearance with this outcome
    Ends(OutcomeKey),
}

impl Count {
    /// A fresh 0-0 count
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a called ball; ball four becomes a walk
    pub fn ball(self) -> PitchStep {
        if self.balls + 1 > MAX_BALLS {
            return PitchStep::Ends(OutcomeKey::Walk);
        }
        PitchStep::Counted(Count {
            balls: (self.balls + 1).min(MAX_BALLS),
            ..self
        })
    }

    /// Apply a strike; strike three becomes a strikeout
    pub fn strike(self) -> PitchStep {
        if self.strikes + 1 > MAX_STRIKES {
            return PitchStep::Ends(OutcomeKey::Strikeout);
        }
        PitchStep::Counted(Count {
            strikes: (self.strikes + 1).min(MAX_STRIKES),
            ..self
        })
    }

    /// Apply a foul ball: a strike that can never be the third one
    pub fn foul(self) -> Count {
        Count {
            strikes: (self.strikes + 1).min(MAX_STRIKES),
            ..self
        }
    }

    /// Three balls and two strikes
    pub fn is_full(&self) -> bool {
        self.balls == MAX_BALLS && self.strikes == MAX_STRIKES
    }
}

impl std::fmt::Display for Count {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.balls, self.strikes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_increments() {
        let count = Count::new();
        assert_eq!(
            count.ball(),
            PitchStep::Counted(Count {
                balls: 1,
                strikes: 0
            })
        );
    }

    #[test]
    fn test_ball_four_is_walk() {
        let count = Count {
            balls: 3,
            strikes: 1,
        };
        assert_eq!(count.ball(), PitchStep::Ends(OutcomeKey::Walk));
    }

    #[test]
    fn test_strike_three_is_strikeout() {
        let count = Count {
            balls: 2,
            strikes: 2,
        };
        assert_eq!(count.strike(), PitchStep::Ends(OutcomeKey::Strikeout));
    }

    #[test]
    fn test_foul_caps_at_two_strikes() {
        let count = Count {
            balls: 1,
            strikes: 2,
        };
        assert_eq!(count.foul(), count);

        let early = Count {
            balls: 3,
            strikes: 0,
        };
        assert_eq!(
            early.foul(),
            Count {
                balls: 3,
                strikes: 1
            }
        );
    }

    #[test]
    fn test_full_count_display() {
        let count = Count {
            balls: 3,
            strikes: 2,
        };
        assert!(count.is_full());
        assert_eq!(count.to_string(), "3-2");
    }
}
