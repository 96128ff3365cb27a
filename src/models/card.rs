//! A flashcard as stored in the Leitner box.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{LearnerId, Slot};

pub type CardId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub owner_id: LearnerId,
    pub question: String,
    pub answer: String,
    pub slot: Slot,
    /// Date of the last review event, or of creation for a new card.
    /// Reviews move it forward to the next scheduled review.
    pub last_review: NaiveDate,
}

impl Card {
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.last_review <= today
    }

    /// Whole days elapsed since `last_review`.
    pub fn overdue_days(&self, today: NaiveDate) -> i64 {
        (today - self.last_review).num_days()
    }
}
