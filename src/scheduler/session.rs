//! Review session over a learner's due cards.
//!
//! A session fetches the due cards once, then walks through them in order.
//! For every card the overdue penalty is worked out when the question is
//! shown, so it can be announced first. Nothing is written until the card
//! is answered: the demotion, then the slot and review date decided by the
//! answer. A card left unanswered keeps its stored state. Cards becoming
//! due during the session are not picked up.

use super::ReviewPrompt;
use super::policy::{self, Decision};
use crate::database::CardStore;
use crate::error::{ReviewError, StoreError};
use crate::models::{Card, CardId, LearnerId, Slot};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Demotion applied to a card reviewed too late.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PenaltyNotice {
    pub overdue_days: i64,
    pub from: Slot,
    pub to: Slot,
}

impl PenaltyNotice {
    pub fn message(&self) -> String {
        format!(
            "Card was overdue ({} days). Moved back to slot {}.",
            self.overdue_days, self.to
        )
    }
}

/// Question currently shown to the learner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub card_id: CardId,
    pub question: String,
    pub penalty: Option<PenaltyNotice>,
}

/// Result of answering one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardReview {
    pub card_id: CardId,
    pub correct: bool,
    pub expected_answer: String,
    pub decision: Decision,
    /// Set when saving the overdue demotion failed.
    pub penalty_write_error: Option<String>,
    /// Set when saving the new slot and date failed.
    pub write_error: Option<String>,
}

impl CardReview {
    pub fn verdict(&self) -> String {
        if self.correct {
            "Correct!".to_string()
        } else {
            format!("Wrong! Correct answer: {}", self.expected_answer)
        }
    }

    pub fn schedule_message(&self) -> String {
        format!(
            "Card moved to slot {}. Next review on {}.",
            self.decision.outcome_slot, self.decision.next_review
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub reviewed: usize,
    pub correct: usize,
    pub penalized: usize,
    pub failed_writes: usize,
}

pub struct ReviewSession {
    pub owner_id: LearnerId,
    pub today: NaiveDate,
    cards: Vec<Card>,
    current_index: usize,
    current_prompt: Option<Prompt>,
    summary: SessionSummary,
}

impl ReviewSession {
    /// Loads the learner's due cards. Returns `None` when nothing is due.
    pub fn start<S: CardStore + ?Sized>(
        store: &S,
        owner_id: LearnerId,
        today: NaiveDate,
    ) -> Result<Option<Self>, StoreError> {
        let cards = store.fetch_due(owner_id, today)?;
        if cards.is_empty() {
            info!(owner_id, %today, "no cards due");
            return Ok(None);
        }

        info!(owner_id, %today, due = cards.len(), "review session started");
        Ok(Some(Self {
            owner_id,
            today,
            cards,
            current_index: 0,
            current_prompt: None,
            summary: SessionSummary::default(),
        }))
    }

    pub fn due_count(&self) -> usize {
        self.cards.len()
    }

    /// Number of cards already answered.
    pub fn position(&self) -> usize {
        self.current_index
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.cards.len()
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Shows the next card, with the demotion it will get for being late.
    /// Nothing is written here; calling this again before
    /// [`submit`](Self::submit) returns the same prompt.
    pub fn next_prompt(&mut self) -> Option<&Prompt> {
        if self.current_prompt.is_none() {
            let card = self.cards.get(self.current_index)?;
            let overdue_days = card.overdue_days(self.today);
            let effective_slot = policy::overdue_penalty(card.slot, overdue_days);

            let penalty = (effective_slot != card.slot).then_some(PenaltyNotice {
                overdue_days,
                from: card.slot,
                to: effective_slot,
            });

            self.current_prompt = Some(Prompt {
                card_id: card.id,
                question: card.question.clone(),
                penalty,
            });
        }
        self.current_prompt.as_ref()
    }

    /// Grades the answer to the shown card, saves the overdue demotion (if
    /// any) and then the new slot and review date, and moves on. Returns
    /// `None` if no card is being shown.
    pub fn submit<S: CardStore + ?Sized>(&mut self, store: &S, raw_answer: &str) -> Option<CardReview> {
        self.current_prompt.take()?;
        let card = self.cards.get(self.current_index)?;

        let overdue_days = card.overdue_days(self.today);
        let correct = policy::answers_match(raw_answer, &card.answer);
        let decision = policy::decide(card.slot, overdue_days, correct, self.today);

        let penalty_write_error = if decision.penalized(card.slot) {
            info!(
                card_id = card.id,
                overdue_days,
                from = %card.slot,
                to = %decision.effective_slot,
                "overdue penalty"
            );
            self.summary.penalized += 1;
            store
                .persist_slot_and_date(card.id, decision.effective_slot, card.last_review)
                .err()
                .map(|e| {
                    warn!(card_id = card.id, error = %e, "saving penalty failed");
                    e.to_string()
                })
        } else {
            None
        };

        let write_error = store
            .persist_slot_and_date(card.id, decision.outcome_slot, decision.next_review)
            .err()
            .map(|e| {
                warn!(card_id = card.id, error = %e, "saving review failed");
                e.to_string()
            });

        let review = CardReview {
            card_id: card.id,
            correct,
            expected_answer: card.answer.clone(),
            decision,
            penalty_write_error,
            write_error,
        };

        self.summary.reviewed += 1;
        if correct {
            self.summary.correct += 1;
        }
        self.summary.failed_writes += usize::from(review.penalty_write_error.is_some())
            + usize::from(review.write_error.is_some());
        self.current_index += 1;

        Some(review)
    }
}

/// Runs a full review pass for one learner, asking every due question
/// through `prompt`. A card whose update cannot be saved is reported and
/// skipped; the session goes on with the next card.
pub fn run_session<S, P>(
    store: &S,
    prompt: &mut P,
    owner_id: LearnerId,
    today: NaiveDate,
) -> Result<SessionSummary, ReviewError>
where
    S: CardStore + ?Sized,
    P: ReviewPrompt + ?Sized,
{
    let Some(mut session) = ReviewSession::start(store, owner_id, today).map_err(ReviewError::Fetch)?
    else {
        prompt.report_outcome("No cards to review today!");
        return Ok(SessionSummary::default());
    };

    prompt.report_outcome(&format!(
        "{} card(s) due for review today!",
        session.due_count()
    ));

    while let Some(shown) = session.next_prompt() {
        let question = shown.question.clone();
        if let Some(penalty) = &shown.penalty {
            prompt.report_outcome(&penalty.message());
        }

        let answer = prompt.present_question(&question)?;
        let Some(review) = session.submit(store, &answer) else {
            break;
        };

        if let Some(e) = &review.penalty_write_error {
            prompt.report_outcome(&format!("Could not save the demotion: {e}"));
        }
        prompt.report_outcome(&review.verdict());
        match &review.write_error {
            None => prompt.report_outcome(&review.schedule_message()),
            Some(e) => prompt.report_outcome(&format!("Could not save this card: {e}")),
        }
    }

    let summary = session.summary();
    prompt.report_outcome(&format!(
        "Review session complete! {} of {} correct.",
        summary.correct, summary.reviewed
    ));
    info!(owner_id, ?summary, "review session finished");
    Ok(summary)
}
