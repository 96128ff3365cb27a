//! Flashcard is a pair <question, answer> as it appears in an exported deck.
//! Slot and review date are optional so hand-written decks stay short.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Slot;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub slot: Slot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review: Option<NaiveDate>,
}
