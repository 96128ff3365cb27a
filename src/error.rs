//! Error types shared by the store, the review driver and the front ends.
use std::io;
use std::path::PathBuf;

use crate::models::{CardId, LearnerId};

/// A raw slot number outside 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("slot {0} is outside the range 1..=6")]
pub struct InvalidSlot(pub i64);

/// Failures surfaced by the card store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("card {0} does not exist")]
    CardNotFound(CardId),

    #[error("learner {0} does not exist")]
    LearnerNotFound(LearnerId),

    #[error("no learner named '{0}'")]
    UnknownLearner(String),

    #[error("learner '{0}' already exists")]
    LearnerExists(String),

    #[error("learner name cannot be empty")]
    EmptyLearnerName,

    #[error("question and answer cannot be empty")]
    EmptyCard,

    #[error("invalid value '{value}' for app state '{key}'")]
    InvalidState { key: String, value: String },

    #[error("could not create database directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reasons a review session stops before its last card.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("could not load due cards: {0}")]
    Fetch(#[source] StoreError),

    #[error("could not read the answer: {0}")]
    Input(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("file error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid deck file: {0}")]
    Json(#[from] serde_json::Error),
}
