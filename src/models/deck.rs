//! Deck is the exported set of one learner's flashcards
use super::Flashcard;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    pub learner: String,
    pub cards: Vec<Flashcard>,
}
