pub mod card;
pub mod deck;
pub mod flashcard;
pub mod learner;
pub mod slot;

pub use card::{Card, CardId};
pub use deck::Deck;
pub use flashcard::Flashcard;
pub use learner::{BoxSummary, Learner, LearnerId};
pub use slot::Slot;
