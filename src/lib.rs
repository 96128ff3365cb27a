pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod scheduler;

pub use config::Config;
pub use error::{ConfigError, ExportError, InvalidSlot, ReviewError, StoreError};
pub use models::{BoxSummary, Card, CardId, Deck, Flashcard, Learner, LearnerId, Slot};
pub use scheduler::{ReviewPrompt, ReviewSession, SessionSummary, run_session};
