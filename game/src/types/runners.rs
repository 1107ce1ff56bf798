//! Base occupancy

use scorebook_protocol::Base;

/// Which bases are occupied
///
/// Only presence is tracked, never runner identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunnerState {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

impl RunnerState {
    /// Bases empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bases loaded
    pub fn loaded() -> Self {
        Self {
            first: true,
            second: true,
            third: true,
        }
    }

    pub fn new(first: bool, second: bool, third: bool) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    pub fn is_occupied(&self, base: Base) -> bool {
        match base {
            Base::First => self.first,
            Base::Second => self.second,
            Base::Third => self.third,
        }
    }

    pub fn set(&mut self, base: Base, occupied: bool) {
        match base {
            Base::First => self.first = occupied,
            Base::Second => self.second = occupied,
            Base::Third => self.third = occupied,
        }
    }

    /// Number of runners on base
    pub fn occupied_count(&self) -> u32 {
        Base::ALL.iter().filter(|b| self.is_occupied(**b)).count() as u32
    }

    /// Occupied bases in base order
    pub fn occupied(&self) -> impl Iterator<Item = Base> + '_ {
        Base::ALL.into_iter().filter(move |b| self.is_occupied(*b))
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    pub fn is_loaded(&self) -> bool {
        self.first && self.second && self.third
    }

    /// Occupancy as a first/second/third digit string, e.g. `"101"`
    pub fn diagram_key(&self) -> String {
        Base::ALL
            .iter()
            .map(|b| if self.is_occupied(*b) { '1' } else { '0' })
            .collect()
    }
}
