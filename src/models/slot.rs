//! Leitner slot number and the fixed review interval of each slot.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InvalidSlot;

/// Review interval in days, indexed by `slot - 1`.
const INTERVAL_DAYS: [i64; 6] = [1, 3, 7, 14, 30, 60];

/// A slot in the Leitner box, always within 1..=6.
///
/// Slot 1 holds the least mastered cards and is reviewed every day,
/// slot 6 holds the most mastered ones and is reviewed every 60 days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Slot(u8);

impl Slot {
    pub const FIRST: Slot = Slot(1);
    pub const LAST: Slot = Slot(6);

    pub fn new(number: u8) -> Option<Self> {
        (Self::FIRST.0..=Self::LAST.0)
            .contains(&number)
            .then_some(Slot(number))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Days until a card placed in this slot becomes due again.
    pub fn interval_days(self) -> i64 {
        INTERVAL_DAYS[usize::from(self.0 - 1)]
    }

    /// Next slot up, capped at the last slot.
    pub fn promoted(self) -> Self {
        Slot((self.0 + 1).min(Self::LAST.0))
    }

    /// Next slot down, floored at the first slot.
    pub fn demoted(self) -> Self {
        Slot((self.0 - 1).max(Self::FIRST.0))
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        (Self::FIRST.0..=Self::LAST.0).map(Slot)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for Slot {
    type Error = InvalidSlot;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Slot::new(value).ok_or(InvalidSlot(i64::from(value)))
    }
}

impl TryFrom<i64> for Slot {
    type Error = InvalidSlot;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Slot::new)
            .ok_or(InvalidSlot(value))
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> Self {
        slot.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
