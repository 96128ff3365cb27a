//! Database operations for the Leitner box
//!
//! Handles SQLite schema setup, learner and card management, the
//! simulated "today", and the slot/date updates made by review sessions.

use crate::database::{CardStore, with_transaction};
use crate::error::StoreError;
use crate::models::{BoxSummary, Card, CardId, Deck, Flashcard, Learner, LearnerId, Slot};
use chrono::{Duration, Local, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tracing::{debug, info};

const CARD_COLUMNS: &str = "id, learner_id, question, answer, slot, last_review";

impl ToSql for Slot {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.get())))
    }
}

impl FromSql for Slot {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = i64::column_result(value)?;
        Slot::try_from(raw).map_err(|_| FromSqlError::OutOfRange(raw))
    }
}

/// Opens (or creates) the database file and makes sure all tables exist.
pub fn open_database(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let conn = Connection::open(path)?;
    init_database(&conn)?;
    info!(path = %path.display(), "database ready");
    Ok(conn)
}

/// Creates tables for learners, cards and app state.
pub fn init_database(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS learners (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            learner_id INTEGER NOT NULL REFERENCES learners(id) ON DELETE CASCADE,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            slot INTEGER NOT NULL DEFAULT 1 CHECK (slot BETWEEN 1 AND 6),
            last_review TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS cards_due ON cards (learner_id, last_review);

        CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        INSERT OR IGNORE INTO app_state (key, value) VALUES ('day_offset', '0');",
    )?;
    Ok(())
}

fn day_offset(conn: &Connection) -> Result<i64, StoreError> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = 'day_offset'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(raw) => raw.trim().parse().map_err(|_| StoreError::InvalidState {
            key: "day_offset".to_string(),
            value: raw,
        }),
    }
}

/// Today as seen by the app: the local date moved forward by the
/// number of simulated days.
pub fn get_current_date(conn: &Connection) -> Result<NaiveDate, StoreError> {
    Ok(Local::now().date_naive() + Duration::days(day_offset(conn)?))
}

/// Moves the app's "today" one day forward (for practising the schedule).
pub fn advance_day(conn: &Connection) -> Result<NaiveDate, StoreError> {
    with_transaction(conn, "advance_day", |conn| {
        let offset = day_offset(conn)? + 1;
        conn.execute(
            "INSERT INTO app_state (key, value) VALUES ('day_offset', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![offset.to_string()],
        )?;
        Ok(())
    })?;

    let today = get_current_date(conn)?;
    info!(%today, "advanced one day");
    Ok(today)
}

fn learner_from_row(row: &Row<'_>) -> rusqlite::Result<Learner> {
    Ok(Learner {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        question: row.get(2)?,
        answer: row.get(3)?,
        slot: row.get(4)?,
        last_review: row.get(5)?,
    })
}

/// Registers a learner profile and returns its ID.
pub fn add_learner(name: &str, conn: &Connection) -> Result<LearnerId, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::EmptyLearnerName);
    }

    with_transaction(conn, "add_learner", |conn| insert_learner(name, conn))
}

/// Insert half of [`add_learner`]; the caller owns the transaction.
fn insert_learner(name: &str, conn: &Connection) -> Result<LearnerId, StoreError> {
    if find_learner(name, conn)?.is_some() {
        return Err(StoreError::LearnerExists(name.to_string()));
    }
    conn.execute("INSERT INTO learners (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub fn find_learner(name: &str, conn: &Connection) -> Result<Option<Learner>, StoreError> {
    let learner = conn
        .query_row(
            "SELECT id, name FROM learners WHERE name = ?1",
            params![name.trim()],
            learner_from_row,
        )
        .optional()?;
    Ok(learner)
}

/// Like [`find_learner`] but a missing learner is an error.
pub fn require_learner(name: &str, conn: &Connection) -> Result<Learner, StoreError> {
    find_learner(name, conn)?.ok_or_else(|| StoreError::UnknownLearner(name.trim().to_string()))
}

pub fn get_all_learners(conn: &Connection) -> Result<Vec<Learner>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name FROM learners ORDER BY name")?;
    let learners = stmt
        .query_map([], learner_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(learners)
}

fn ensure_learner_exists(learner_id: LearnerId, conn: &Connection) -> Result<(), StoreError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM learners WHERE id = ?1)",
        params![learner_id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(StoreError::LearnerNotFound(learner_id))
    }
}

fn insert_card(
    learner_id: LearnerId,
    question: &str,
    answer: &str,
    slot: Slot,
    last_review: NaiveDate,
    conn: &Connection,
) -> Result<CardId, StoreError> {
    let (question, answer) = (question.trim(), answer.trim());
    if question.is_empty() || answer.is_empty() {
        return Err(StoreError::EmptyCard);
    }

    conn.execute(
        "INSERT INTO cards (learner_id, question, answer, slot, last_review)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![learner_id, question, answer, slot, last_review],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Adds a new card in slot 1, due today. Returns the card ID.
pub fn add_card(
    learner_id: LearnerId,
    question: &str,
    answer: &str,
    conn: &Connection,
) -> Result<CardId, StoreError> {
    let today = get_current_date(conn)?;
    let id = with_transaction(conn, "add_card", |conn| {
        ensure_learner_exists(learner_id, conn)?;
        insert_card(learner_id, question, answer, Slot::FIRST, today, conn)
    })?;
    debug!(card_id = id, learner_id, "card added");
    Ok(id)
}

pub fn get_card(card_id: CardId, conn: &Connection) -> Result<Card, StoreError> {
    conn.query_row(
        &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
        params![card_id],
        card_from_row,
    )
    .optional()?
    .ok_or(StoreError::CardNotFound(card_id))
}

/// Retrieves one learner's cards in a given slot, oldest first.
pub fn get_cards_by_slot(
    learner_id: LearnerId,
    slot: Slot,
    conn: &Connection,
) -> Result<Vec<Card>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CARD_COLUMNS} FROM cards WHERE learner_id = ?1 AND slot = ?2 ORDER BY id"
    ))?;
    let cards = stmt
        .query_map(params![learner_id, slot], card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

pub fn get_all_cards(learner_id: LearnerId, conn: &Connection) -> Result<Vec<Card>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CARD_COLUMNS} FROM cards WHERE learner_id = ?1 ORDER BY slot, id"
    ))?;
    let cards = stmt
        .query_map(params![learner_id], card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

/// Changes the text of a card. A blank field keeps its current value;
/// slot and review date are left alone.
pub fn edit_card(
    card_id: CardId,
    question: &str,
    answer: &str,
    conn: &Connection,
) -> Result<Card, StoreError> {
    with_transaction(conn, "edit_card", |conn| {
        let mut card = get_card(card_id, conn)?;
        if !question.trim().is_empty() {
            card.question = question.trim().to_string();
        }
        if !answer.trim().is_empty() {
            card.answer = answer.trim().to_string();
        }

        conn.execute(
            "UPDATE cards SET question = ?1, answer = ?2 WHERE id = ?3",
            params![card.question, card.answer, card_id],
        )?;
        Ok(card)
    })
}

pub fn delete_card(card_id: CardId, conn: &Connection) -> Result<(), StoreError> {
    with_transaction(conn, "delete_card", |conn| {
        let deleted = conn.execute("DELETE FROM cards WHERE id = ?1", params![card_id])?;
        if deleted == 0 {
            return Err(StoreError::CardNotFound(card_id));
        }
        Ok(())
    })?;
    debug!(card_id, "card deleted");
    Ok(())
}

/// Counts a learner's cards per slot.
pub fn get_box_summary(learner_id: LearnerId, conn: &Connection) -> Result<BoxSummary, StoreError> {
    let mut stmt =
        conn.prepare("SELECT slot, COUNT(*) FROM cards WHERE learner_id = ?1 GROUP BY slot")?;
    let rows = stmt
        .query_map(params![learner_id], |row| {
            Ok((row.get::<_, Slot>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut summary = BoxSummary::default();
    for (slot, count) in rows {
        summary.set(slot, usize::try_from(count).unwrap_or(0));
    }
    Ok(summary)
}

/// Retrieves cards due for review: `last_review` on or before `today`,
/// lowest slot first.
pub fn get_due_cards(
    learner_id: LearnerId,
    today: NaiveDate,
    conn: &Connection,
) -> Result<Vec<Card>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CARD_COLUMNS} FROM cards
         WHERE learner_id = ?1 AND last_review <= ?2
         ORDER BY slot ASC, id ASC"
    ))?;
    let cards = stmt
        .query_map(params![learner_id, today], card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

/// Stores the slot and review date produced by a review.
pub fn update_slot_and_date(
    card_id: CardId,
    slot: Slot,
    last_review: NaiveDate,
    conn: &Connection,
) -> Result<(), StoreError> {
    with_transaction(conn, "update_slot_and_date", |conn| {
        let updated = conn.execute(
            "UPDATE cards SET slot = ?1, last_review = ?2 WHERE id = ?3",
            params![slot, last_review, card_id],
        )?;
        if updated == 0 {
            return Err(StoreError::CardNotFound(card_id));
        }
        Ok(())
    })?;
    debug!(card_id, %slot, %last_review, "card rescheduled");
    Ok(())
}

/// Loads every card of a learner as an exportable deck, progress included.
pub fn load_deck(learner: &Learner, conn: &Connection) -> Result<Deck, StoreError> {
    let cards = get_all_cards(learner.id, conn)?
        .into_iter()
        .map(|card| Flashcard {
            question: card.question,
            answer: card.answer,
            slot: card.slot,
            last_review: Some(card.last_review),
        })
        .collect();

    Ok(Deck {
        learner: learner.name.clone(),
        cards,
    })
}

/// Adds all cards of a deck to a learner's box in one transaction.
/// Cards without a review date become due today. Returns the number of
/// cards added.
pub fn import_deck(deck: &Deck, learner_id: LearnerId, conn: &Connection) -> Result<usize, StoreError> {
    let today = get_current_date(conn)?;
    let imported = with_transaction(conn, "import_deck", |conn| {
        ensure_learner_exists(learner_id, conn)?;
        insert_deck_cards(deck, learner_id, today, conn)
    })?;
    info!(learner_id, imported, "deck imported");
    Ok(imported)
}

/// Imports a deck into the learner named in the file, creating the
/// learner first if needed. Learner and cards share one transaction: a
/// rejected card leaves neither behind.
pub fn import_deck_for_named_learner(
    deck: &Deck,
    conn: &Connection,
) -> Result<(LearnerId, usize), StoreError> {
    let name = deck.learner.trim();
    if name.is_empty() {
        return Err(StoreError::EmptyLearnerName);
    }

    let today = get_current_date(conn)?;
    let (learner_id, imported) = with_transaction(conn, "import_deck_for_named_learner", |conn| {
        let learner_id = match find_learner(name, conn)? {
            Some(learner) => learner.id,
            None => insert_learner(name, conn)?,
        };
        let imported = insert_deck_cards(deck, learner_id, today, conn)?;
        Ok((learner_id, imported))
    })?;
    info!(learner_id, imported, "deck imported");
    Ok((learner_id, imported))
}

fn insert_deck_cards(
    deck: &Deck,
    learner_id: LearnerId,
    today: NaiveDate,
    conn: &Connection,
) -> Result<usize, StoreError> {
    for card in &deck.cards {
        insert_card(
            learner_id,
            &card.question,
            &card.answer,
            card.slot,
            card.last_review.unwrap_or(today),
            conn,
        )?;
    }
    Ok(deck.cards.len())
}

impl CardStore for Connection {
    fn fetch_due(&self, owner_id: LearnerId, today: NaiveDate) -> Result<Vec<Card>, StoreError> {
        get_due_cards(owner_id, today, self)
    }

    fn persist_slot_and_date(
        &self,
        card_id: CardId,
        slot: Slot,
        last_review: NaiveDate,
    ) -> Result<(), StoreError> {
        update_slot_and_date(card_id, slot, last_review, self)
    }
}
