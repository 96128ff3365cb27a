//! JSON import/export of a learner's deck.
//! Saves and loads Deck structures to/from JSON files.

use crate::error::ExportError;
use crate::models::Deck;
use std::fs;
use std::path::Path;
use tracing::info;

/// Exports a deck to a pretty-printed JSON file at the specified path.
pub fn export_json_to_path(deck: &Deck, path: &Path) -> Result<(), ExportError> {
    let json_string = serde_json::to_string_pretty(deck)?;
    fs::write(path, json_string)?;
    info!(learner = %deck.learner, cards = deck.cards.len(), path = %path.display(), "deck exported");
    Ok(())
}

/// Imports a deck from a JSON file.
/// Fails if the file doesn't exist, contains invalid JSON, or holds a
/// card with a slot outside 1..=6.
pub fn import_json(path: &Path) -> Result<Deck, ExportError> {
    let contents = fs::read_to_string(path)?;
    let deck: Deck = serde_json::from_str(&contents)?;
    info!(learner = %deck.learner, cards = deck.cards.len(), path = %path.display(), "deck read");
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Flashcard, Slot};
    use chrono::NaiveDate;

    fn create_test_deck() -> Deck {
        Deck {
            learner: "anna".to_string(),
            cards: vec![
                Flashcard {
                    question: "hello".to_string(),
                    answer: "cześć".to_string(),
                    slot: Slot::new(2).unwrap(),
                    last_review: NaiveDate::from_ymd_opt(2024, 4, 2),
                },
                Flashcard {
                    question: "goodbye".to_string(),
                    answer: "do widzenia".to_string(),
                    slot: Slot::FIRST,
                    last_review: None,
                },
            ],
        }
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anna.json");
        let deck = create_test_deck();

        export_json_to_path(&deck, &path).unwrap();
        let imported = import_json(&path).unwrap();

        assert_eq!(imported.learner, deck.learner);
        assert_eq!(imported.cards, deck.cards);
    }

    #[test]
    fn test_import_handwritten_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        fs::write(
            &path,
            r#"{
  "learner": "bob",
  "cards": [
    { "question": "test question", "answer": "test answer" }
  ]
}"#,
        )
        .unwrap();

        let deck = import_json(&path).unwrap();
        assert_eq!(deck.learner, "bob");
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].slot, Slot::FIRST);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = import_json(&dir.path().join("nonexistent.json"));
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_json(&path), Err(ExportError::Json(_))));
    }

    #[test]
    fn test_import_rejects_invalid_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_slot.json");
        fs::write(
            &path,
            r#"{ "learner": "bob", "cards": [ { "question": "q", "answer": "a", "slot": 9 } ] }"#,
        )
        .unwrap();

        assert!(matches!(import_json(&path), Err(ExportError::Json(_))));
    }
}
