//! Property tests for the Leitner slot/interval policy.

use chrono::{Duration, NaiveDate};
use leitner_app::Slot;
use leitner_app::scheduler::{GRACE_PERIOD_DAYS, decide, policy};
use proptest::prelude::*;

fn arb_slot() -> impl Strategy<Value = Slot> {
    (1u8..=6).prop_map(|n| Slot::new(n).unwrap())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..20_000).prop_map(|days| NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(days))
}

proptest! {
    #[test]
    fn no_penalty_within_grace(
        slot in arb_slot(),
        overdue_days in -30i64..=62,
        correct in any::<bool>(),
        today in arb_date(),
    ) {
        prop_assume!(overdue_days <= slot.interval_days() + GRACE_PERIOD_DAYS);
        let decision = decide(slot, overdue_days, correct, today);
        prop_assert_eq!(decision.effective_slot, slot);
    }

    #[test]
    fn late_review_demotes_exactly_one_slot(
        n in 2u8..=6,
        extra in 1i64..1_000,
        correct in any::<bool>(),
        today in arb_date(),
    ) {
        let slot = Slot::new(n).unwrap();
        let overdue_days = slot.interval_days() + GRACE_PERIOD_DAYS + extra;
        let decision = decide(slot, overdue_days, correct, today);
        prop_assert_eq!(decision.effective_slot.get(), n - 1);
    }

    #[test]
    fn first_slot_never_demoted(overdue_days in any::<i32>(), today in arb_date()) {
        let decision = decide(Slot::FIRST, i64::from(overdue_days), true, today);
        prop_assert_eq!(decision.effective_slot, Slot::FIRST);
    }

    #[test]
    fn correct_answer_promotes_capped(slot in arb_slot(), today in arb_date()) {
        let outcome = policy::transition(slot, true);
        prop_assert_eq!(outcome.get(), (slot.get() + 1).min(6));
        prop_assert_eq!(decide(slot, 0, true, today).outcome_slot, outcome);
    }

    #[test]
    fn wrong_answer_always_resets(
        slot in arb_slot(),
        overdue_days in 0i64..500,
        today in arb_date(),
    ) {
        let decision = decide(slot, overdue_days, false, today);
        prop_assert_eq!(decision.outcome_slot, Slot::FIRST);
    }

    #[test]
    fn next_review_is_outcome_interval(
        slot in arb_slot(),
        overdue_days in 0i64..500,
        correct in any::<bool>(),
        today in arb_date(),
    ) {
        let decision = decide(slot, overdue_days, correct, today);
        prop_assert_eq!(
            (decision.next_review - today).num_days(),
            decision.outcome_slot.interval_days()
        );
        prop_assert!(decision.next_review > today);
    }

    #[test]
    fn answer_matching_ignores_case_and_padding(
        answer in "[a-zA-Z][a-zA-Z ]{0,20}[a-zA-Z]",
        left in " {0,3}",
        right in " {0,3}",
    ) {
        let typed = format!("{left}{}{right}", answer.to_uppercase());
        prop_assert!(policy::answers_match(&typed, &answer));
    }
}
