//! Learner profiles and their per-slot card counts.
use super::Slot;

pub type LearnerId = i64;

/// Owner of a set of cards. Learners are identified by a unique name only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Learner {
    pub id: LearnerId,
    pub name: String,
}

/// Number of cards a learner has in each slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoxSummary {
    counts: [usize; 6],
}

impl BoxSummary {
    pub fn set(&mut self, slot: Slot, count: usize) {
        self.counts[usize::from(slot.get() - 1)] = count;
    }

    pub fn count(&self, slot: Slot) -> usize {
        self.counts[usize::from(slot.get() - 1)]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, usize)> + '_ {
        Slot::all().map(|slot| (slot, self.count(slot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_summary_counts() {
        let mut summary = BoxSummary::default();
        summary.set(Slot::FIRST, 4);
        summary.set(Slot::LAST, 2);

        assert_eq!(summary.count(Slot::FIRST), 4);
        assert_eq!(summary.count(Slot::new(3).unwrap()), 0);
        assert_eq!(summary.total(), 6);
        assert_eq!(summary.iter().count(), 6);
    }
}
