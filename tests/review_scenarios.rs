//! End-to-end review sessions against a SQLite database on disk.

use chrono::{Duration, NaiveDate};
use leitner_app::database::db;
use leitner_app::scheduler::TerminalPrompt;
use leitner_app::{CardId, LearnerId, ReviewError, Slot, run_session};
use rusqlite::Connection;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    conn: Connection,
    learner: LearnerId,
    today: NaiveDate,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let conn = db::open_database(&dir.path().join("leitner.sqlite3")).unwrap();
    let learner = db::add_learner("anna", &conn).unwrap();
    let today = db::get_current_date(&conn).unwrap();
    Fixture {
        _dir: dir,
        conn,
        learner,
        today,
    }
}

impl Fixture {
    fn card(&self, question: &str, answer: &str, slot: u8, days_ago: i64) -> CardId {
        let id = db::add_card(self.learner, question, answer, &self.conn).unwrap();
        db::update_slot_and_date(
            id,
            Slot::new(slot).unwrap(),
            self.today - Duration::days(days_ago),
            &self.conn,
        )
        .unwrap();
        id
    }

    fn review(&self, input: &str) -> (Result<leitner_app::SessionSummary, ReviewError>, String) {
        let mut prompt = TerminalPrompt::new(input.as_bytes(), Vec::new());
        let result = run_session(&self.conn, &mut prompt, self.learner, self.today);
        let output = String::from_utf8(prompt.into_output()).unwrap();
        (result, output)
    }
}

#[test]
fn on_time_correct_answer_moves_up_one_slot() {
    let fx = fixture();
    let id = fx.card("kot", "cat", 3, 7);

    let (result, output) = fx.review("Cat\n");

    let card = db::get_card(id, &fx.conn).unwrap();
    assert_eq!(card.slot, Slot::new(4).unwrap());
    assert_eq!(card.last_review, fx.today + Duration::days(14));
    assert_eq!(result.unwrap().penalized, 0);
    assert!(!output.contains("overdue"));
}

#[test]
fn late_review_is_demoted_then_promoted() {
    let fx = fixture();
    let id = fx.card("pies", "dog", 3, 12);

    let (result, output) = fx.review("dog\n");

    let card = db::get_card(id, &fx.conn).unwrap();
    assert_eq!(card.slot, Slot::new(3).unwrap());
    assert_eq!(card.last_review, fx.today + Duration::days(7));
    assert_eq!(result.unwrap().penalized, 1);

    let notice = output.find("Moved back to slot 2").unwrap();
    let question = output.find("Q: pies").unwrap();
    assert!(notice < question);
}

#[test]
fn wrong_answer_goes_back_to_first_slot() {
    let fx = fixture();
    let id = fx.card("ryba", "fish", 5, 2);

    let (result, output) = fx.review("bird\n");

    let card = db::get_card(id, &fx.conn).unwrap();
    assert_eq!(card.slot, Slot::FIRST);
    assert_eq!(card.last_review, fx.today + Duration::days(1));
    assert_eq!(result.unwrap().correct, 0);
    assert!(output.contains("Wrong! Correct answer: fish"));
}

#[test]
fn nothing_due_leaves_cards_untouched() {
    let fx = fixture();
    let id = fx.card("koń", "horse", 2, -3);
    let before = db::get_card(id, &fx.conn).unwrap();

    let (result, output) = fx.review("");

    assert_eq!(result.unwrap().reviewed, 0);
    assert!(output.contains("No cards to review today!"));
    assert_eq!(db::get_card(id, &fx.conn).unwrap(), before);
}

#[test]
fn session_walks_cards_from_lowest_slot() {
    let fx = fixture();
    fx.card("trzy", "three", 3, 7);
    fx.card("jeden", "one", 1, 0);
    fx.card("dwa", "two", 2, 3);

    let (result, output) = fx.review("one\ntwo\nthree\n");

    assert_eq!(result.unwrap().correct, 3);
    let first = output.find("Q: jeden").unwrap();
    let second = output.find("Q: dwa").unwrap();
    let third = output.find("Q: trzy").unwrap();
    assert!(first < second && second < third);

    let summary = db::get_box_summary(fx.learner, &fx.conn).unwrap();
    assert_eq!(summary.count(Slot::new(2).unwrap()), 1);
    assert_eq!(summary.count(Slot::new(3).unwrap()), 1);
    assert_eq!(summary.count(Slot::new(4).unwrap()), 1);
}

#[test]
fn reviewed_cards_are_not_due_again_today() {
    let fx = fixture();
    fx.card("mleko", "milk", 1, 0);

    let (first, _) = fx.review("milk\n");
    assert_eq!(first.unwrap().reviewed, 1);

    let (second, output) = fx.review("");
    assert_eq!(second.unwrap().reviewed, 0);
    assert!(output.contains("No cards to review today!"));
}

#[test]
fn closed_input_stops_the_session() {
    let fx = fixture();
    let answered = fx.card("chleb", "bread", 1, 0);
    let untouched = fx.card("woda", "water", 1, 0);

    let (result, _) = fx.review("bread\n");

    assert!(matches!(result, Err(ReviewError::Input(_))));
    assert_eq!(db::get_card(answered, &fx.conn).unwrap().slot, Slot::new(2).unwrap());
    assert_eq!(
        db::get_card(untouched, &fx.conn).unwrap().last_review,
        fx.today
    );
}
