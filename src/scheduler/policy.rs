//! Leitner slot/interval policy.
//!
//! Decides, for a due card, which slot it lands in and when it is due again:
//! - A review later than the slot interval plus a 2-day grace period demotes
//!   the card one slot before the answer is looked at (never below slot 1)
//! - A correct answer promotes the (possibly demoted) card one slot, capped at 6
//! - A wrong answer sends the card back to slot 1
//! - The next review is the interval of the resulting slot, counted from today

use crate::models::Slot;
use chrono::{Duration, NaiveDate};

/// Days a review may run late before the overdue penalty applies.
pub const GRACE_PERIOD_DAYS: i64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Slot after the overdue penalty, before the answer is applied.
    pub effective_slot: Slot,
    /// Slot to persist.
    pub outcome_slot: Slot,
    /// Date to persist as the card's `last_review`.
    pub next_review: NaiveDate,
}

impl Decision {
    pub fn penalized(&self, current_slot: Slot) -> bool {
        self.effective_slot != current_slot
    }
}

/// Slot after applying the overdue penalty.
pub fn overdue_penalty(current_slot: Slot, overdue_days: i64) -> Slot {
    let allowed = current_slot.interval_days() + GRACE_PERIOD_DAYS;
    if overdue_days > allowed {
        current_slot.demoted()
    } else {
        current_slot
    }
}

/// Slot after the learner's answer.
pub fn transition(effective_slot: Slot, answered_correctly: bool) -> Slot {
    if answered_correctly {
        effective_slot.promoted()
    } else {
        Slot::FIRST
    }
}

pub fn next_review_date(outcome_slot: Slot, today: NaiveDate) -> NaiveDate {
    today + Duration::days(outcome_slot.interval_days())
}

/// Full decision for one reviewed card.
pub fn decide(
    current_slot: Slot,
    overdue_days: i64,
    answered_correctly: bool,
    today: NaiveDate,
) -> Decision {
    let effective_slot = overdue_penalty(current_slot, overdue_days);
    let outcome_slot = transition(effective_slot, answered_correctly);

    Decision {
        effective_slot,
        outcome_slot,
        next_review: next_review_date(outcome_slot, today),
    }
}

/// Compares a typed answer with the stored one, ignoring case and
/// surrounding whitespace. An empty answer never matches a stored one.
pub fn answers_match(given: &str, expected: &str) -> bool {
    let given = given.trim();
    !given.is_empty() && given.to_lowercase() == expected.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(n: u8) -> Slot {
        Slot::new(n).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_on_time_correct_answer_promotes() {
        let decision = decide(slot(3), 7, true, today());

        assert_eq!(decision.effective_slot, slot(3));
        assert_eq!(decision.outcome_slot, slot(4));
        assert_eq!(decision.next_review, today() + Duration::days(14));
        assert!(!decision.penalized(slot(3)));
    }

    #[test]
    fn test_late_review_demotes_before_promotion() {
        let decision = decide(slot(3), 12, true, today());

        assert_eq!(decision.effective_slot, slot(2));
        assert_eq!(decision.outcome_slot, slot(3));
        assert_eq!(decision.next_review, today() + Duration::days(7));
        assert!(decision.penalized(slot(3)));
    }

    #[test]
    fn test_wrong_answer_resets_to_first_slot() {
        let decision = decide(slot(5), 2, false, today());

        assert_eq!(decision.effective_slot, slot(5));
        assert_eq!(decision.outcome_slot, Slot::FIRST);
        assert_eq!(decision.next_review, today() + Duration::days(1));
    }

    #[test]
    fn test_grace_period_boundary() {
        // interval(2) + grace = 5
        assert_eq!(overdue_penalty(slot(2), 5), slot(2));
        assert_eq!(overdue_penalty(slot(2), 6), slot(1));
    }

    #[test]
    fn test_first_slot_never_penalized() {
        assert_eq!(overdue_penalty(Slot::FIRST, 400), Slot::FIRST);
    }

    #[test]
    fn test_last_slot_stays_on_correct_answer() {
        let decision = decide(Slot::LAST, 0, true, today());
        assert_eq!(decision.outcome_slot, Slot::LAST);
        assert_eq!(decision.next_review, today() + Duration::days(60));
    }

    #[test]
    fn test_answers_match_ignores_case_and_whitespace() {
        assert!(answers_match("  Hello ", "hello"));
        assert!(answers_match("THANK YOU", " thank you"));
        assert!(!answers_match("helo", "hello"));
        assert!(!answers_match("", "hello"));
        assert!(!answers_match("   ", "hello"));
    }
}
