//! Desktop window: learner profiles, the box overview, card management
//! and review sessions.

use crate::database::db;
use crate::export::json::{export_json_to_path, import_json};
use crate::models::{BoxSummary, Card, CardId, Learner, Slot};
use crate::scheduler::{CardReview, ReviewSession};
use eframe::egui;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    Review,
}

/// Text being edited for an existing card.
struct CardEdit {
    card_id: CardId,
    question: String,
    answer: String,
}

/// Review in progress: the session plus what the learner sees.
struct ReviewScreen {
    learner_name: String,
    session: ReviewSession,
    typed_answer: String,
    last_review: Option<CardReview>,
}

/// Main application state
pub struct LeitnerApp {
    conn: Arc<Mutex<Connection>>,
    show_confirmation_dialog: bool,
    allowed_to_close: bool,

    learners: Vec<Learner>,
    selected_learner_index: Option<usize>,
    new_learner_name: String,

    current_question: String,
    current_answer: String,
    box_summary: BoxSummary,
    browsed_slot: Slot,
    slot_cards: Vec<Card>,
    editing: Option<CardEdit>,

    current_screen: AppScreen,
    review: Option<ReviewScreen>,

    current_date_display: String,
    status_message: String,

    show_result_dialog: bool,
    result_message: String,
}

impl eframe::App for LeitnerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Review => self.render_review_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_result_dialog {
            egui::Window::new("Import/Export Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl LeitnerApp {
    /// Creates the window state, preselecting `default_learner` if it exists.
    pub fn new(conn: Connection, default_learner: Option<String>) -> Self {
        let mut app = Self {
            conn: Arc::new(Mutex::new(conn)),
            show_confirmation_dialog: false,
            allowed_to_close: false,
            learners: Vec::new(),
            selected_learner_index: None,
            new_learner_name: String::new(),
            current_question: String::new(),
            current_answer: String::new(),
            box_summary: BoxSummary::default(),
            browsed_slot: Slot::FIRST,
            slot_cards: Vec::new(),
            editing: None,
            current_screen: AppScreen::Main,
            review: None,
            current_date_display: String::new(),
            status_message: String::new(),
            show_result_dialog: false,
            result_message: String::new(),
        };

        app.reload_learners();
        app.selected_learner_index = default_learner
            .and_then(|name| app.learners.iter().position(|l| l.name == name))
            .or(if app.learners.is_empty() { None } else { Some(0) });
        app.refresh();
        app
    }

    fn selected_learner(&self) -> Option<&Learner> {
        self.selected_learner_index
            .and_then(|i| self.learners.get(i))
    }

    fn reload_learners(&mut self) {
        let Ok(conn) = self.conn.lock() else { return };
        match db::get_all_learners(&conn) {
            Ok(learners) => self.learners = learners,
            Err(e) => self.status_message = format!("Could not load learners: {e}"),
        }
    }

    /// Re-reads the date, box summary and browsed slot from the database.
    fn refresh(&mut self) {
        let Ok(conn) = self.conn.lock() else { return };

        self.current_date_display = match db::get_current_date(&conn) {
            Ok(today) => today.format("%Y-%m-%d").to_string(),
            Err(_) => "Unknown".to_string(),
        };

        let learner_id = self
            .selected_learner_index
            .and_then(|i| self.learners.get(i))
            .map(|l| l.id);
        let Some(learner_id) = learner_id else {
            self.box_summary = BoxSummary::default();
            self.slot_cards.clear();
            return;
        };

        let loaded = db::get_box_summary(learner_id, &conn).and_then(|summary| {
            let cards = db::get_cards_by_slot(learner_id, self.browsed_slot, &conn)?;
            Ok((summary, cards))
        });
        match loaded {
            Ok((summary, cards)) => {
                self.box_summary = summary;
                self.slot_cards = cards;
            }
            Err(e) => self.status_message = format!("Could not load cards: {e}"),
        }
    }

    /// Renders the main screen with learner and card management
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        // Actions are collected while drawing and applied afterwards
        let mut action_next_day = false;
        let mut action_create_learner = false;
        let mut action_select: Option<usize> = None;
        let mut action_review = false;
        let mut action_add_card = false;
        let mut action_browse: Option<Slot> = None;
        let mut action_start_edit: Option<CardId> = None;
        let mut action_save_edit = false;
        let mut action_cancel_edit = false;
        let mut action_delete: Option<CardId> = None;
        let mut action_export = false;
        let mut action_import = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Today: {}", self.current_date_display));
                if ui.button("Next Day").clicked() {
                    action_next_day = true;
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Export Box").clicked() {
                    action_export = true;
                }
                if ui.button("Import Deck").clicked() {
                    action_import = true;
                }
            });
            ui.separator();

            ui.heading("Learners");
            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut self.new_learner_name);
                if ui.button("Create Learner").clicked() {
                    action_create_learner = true;
                }
            });

            egui::ScrollArea::vertical()
                .id_source("learners_list")
                .max_height(100.0)
                .show(ui, |ui| {
                    for (i, learner) in self.learners.iter().enumerate() {
                        let is_selected = self.selected_learner_index == Some(i);
                        if ui.selectable_label(is_selected, &learner.name).clicked() {
                            action_select = Some(i);
                        }
                    }
                });

            ui.separator();

            let Some(learner) = self.selected_learner() else {
                ui.label("Create or select a learner to manage cards");
                return;
            };
            let learner_name = learner.name.clone();

            ui.horizontal(|ui| {
                ui.heading(format!("{}'s Leitner box", learner_name));
                if ui.button("Review Cards").clicked() {
                    action_review = true;
                }
            });

            ui.horizontal(|ui| {
                for (slot, count) in self.box_summary.iter() {
                    let label = format!("Slot {slot}: {count}");
                    if ui.selectable_label(self.browsed_slot == slot, label).clicked() {
                        action_browse = Some(slot);
                    }
                }
            });
            ui.label(format!(
                "{} cards in total, reviewed every {} day(s) in slot {}",
                self.box_summary.total(),
                self.browsed_slot.interval_days(),
                self.browsed_slot
            ));

            ui.separator();

            ui.heading("Add Card");
            ui.horizontal(|ui| {
                ui.label("Question:");
                ui.text_edit_singleline(&mut self.current_question);
            });
            ui.horizontal(|ui| {
                ui.label("Answer:");
                ui.text_edit_singleline(&mut self.current_answer);
            });
            if ui.button("Add Card").clicked() {
                action_add_card = true;
            }

            ui.separator();

            ui.heading(format!(
                "Slot {} cards ({})",
                self.browsed_slot,
                self.slot_cards.len()
            ));

            egui::ScrollArea::vertical()
                .id_source("slot_cards_list")
                .max_height(220.0)
                .show(ui, |ui| {
                    for card in &self.slot_cards {
                        ui.group(|ui| {
                            match &mut self.editing {
                                Some(edit) if edit.card_id == card.id => {
                                    ui.label("Leave a field blank to keep it.");
                                    ui.horizontal(|ui| {
                                        ui.label("Question:");
                                        ui.text_edit_singleline(&mut edit.question);
                                    });
                                    ui.horizontal(|ui| {
                                        ui.label("Answer:");
                                        ui.text_edit_singleline(&mut edit.answer);
                                    });
                                    ui.horizontal(|ui| {
                                        if ui.button("Save").clicked() {
                                            action_save_edit = true;
                                        }
                                        if ui.button("Cancel").clicked() {
                                            action_cancel_edit = true;
                                        }
                                    });
                                }
                                _ => {
                                    ui.label(format!("Q: {}", card.question));
                                    ui.label(format!("A: {}", card.answer));
                                    ui.label(format!("Due: {}", card.last_review));
                                    ui.horizontal(|ui| {
                                        if ui.button("Edit").clicked() {
                                            action_start_edit = Some(card.id);
                                        }
                                        if ui.button("Delete").clicked() {
                                            action_delete = Some(card.id);
                                        }
                                    });
                                }
                            }
                        });
                    }
                });

            if !self.status_message.is_empty() {
                ui.separator();
                ui.label(&self.status_message);
            }
        });

        // Execute deferred actions
        if action_next_day {
            self.handle_next_day();
        }
        if action_create_learner {
            self.handle_create_learner();
        }
        if let Some(i) = action_select {
            self.selected_learner_index = Some(i);
            self.editing = None;
            self.refresh();
        }
        if let Some(slot) = action_browse {
            self.browsed_slot = slot;
            self.editing = None;
            self.refresh();
        }
        if action_add_card {
            self.handle_add_card();
        }
        if let Some(card_id) = action_start_edit {
            self.editing = Some(CardEdit {
                card_id,
                question: String::new(),
                answer: String::new(),
            });
        }
        if action_save_edit {
            self.handle_save_edit();
        }
        if action_cancel_edit {
            self.editing = None;
        }
        if let Some(card_id) = action_delete {
            self.handle_delete(card_id);
        }
        if action_review {
            self.start_review_session();
        }
        if action_export {
            self.handle_export();
        }
        if action_import {
            self.handle_import();
        }
    }

    /// Renders the review screen: one question at a time, then its outcome
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        let mut action_submit = false;
        let mut action_continue = false;
        let mut action_back = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Ok(conn) = self.conn.lock() else {
                ui.label("Database is unavailable.");
                return;
            };
            let Some(review) = &mut self.review else {
                action_back = true;
                return;
            };

            ui.heading(format!("Reviewing: {}", review.learner_name));
            ui.label(format!(
                "Card {} of {} (today is {})",
                (review.session.position() + 1).min(review.session.due_count()),
                review.session.due_count(),
                review.session.today
            ));
            ui.add_space(20.0);

            if let Some(result) = &review.last_review {
                ui.group(|ui| {
                    ui.set_min_height(120.0);
                    ui.vertical_centered(|ui| {
                        ui.heading(result.verdict());
                        ui.add_space(10.0);
                        if let Some(e) = &result.penalty_write_error {
                            ui.label(format!("Could not save the demotion: {e}"));
                        }
                        match &result.write_error {
                            None => ui.label(result.schedule_message()),
                            Some(e) => ui.label(format!("Could not save this card: {e}")),
                        };
                    });
                });
                ui.add_space(20.0);
                if ui.button("Continue").clicked() {
                    action_continue = true;
                }
            } else if review.session.is_finished() {
                let summary = review.session.summary();
                ui.heading("Review session complete!");
                ui.label(format!(
                    "{} of {} correct, {} demoted for late review",
                    summary.correct, summary.reviewed, summary.penalized
                ));
                if summary.failed_writes > 0 {
                    ui.label(format!(
                        "{} update(s) could not be saved.",
                        summary.failed_writes
                    ));
                }
            } else if let Some(prompt) = review.session.next_prompt() {
                if let Some(penalty) = &prompt.penalty {
                    ui.label(penalty.message());
                    ui.add_space(10.0);
                }

                let question = prompt.question.clone();
                ui.group(|ui| {
                    ui.set_min_height(120.0);
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.heading("Question:");
                        ui.label(&question);
                        ui.add_space(20.0);
                    });
                });

                ui.add_space(20.0);
                ui.horizontal(|ui| {
                    ui.label("Your answer:");
                    let response = ui.text_edit_singleline(&mut review.typed_answer);
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        action_submit = true;
                    }
                });
                if ui.button("Check").clicked() {
                    action_submit = true;
                }
            }

            ui.add_space(20.0);
            if ui.button("Back to Main Screen").clicked() {
                action_back = true;
            }

            if action_submit {
                let answer = std::mem::take(&mut review.typed_answer);
                review.last_review = review.session.submit(&*conn, &answer);
            }
            if action_continue {
                review.last_review = None;
            }
        });

        if action_back {
            self.current_screen = AppScreen::Main;
            self.review = None;
            self.refresh();
        }
    }

    /// Starts a review session over the selected learner's due cards
    fn start_review_session(&mut self) {
        let Some(learner) = self.selected_learner().cloned() else {
            return;
        };
        let Ok(conn) = self.conn.lock() else { return };

        let started = db::get_current_date(&conn)
            .and_then(|today| ReviewSession::start(&*conn, learner.id, today));
        drop(conn);

        match started {
            Ok(Some(session)) => {
                self.review = Some(ReviewScreen {
                    learner_name: learner.name,
                    session,
                    typed_answer: String::new(),
                    last_review: None,
                });
                self.current_screen = AppScreen::Review;
                self.status_message.clear();
            }
            Ok(None) => self.status_message = "No cards to review today!".to_string(),
            Err(e) => self.status_message = format!("Could not start review: {e}"),
        }
    }

    fn handle_next_day(&mut self) {
        if let Ok(conn) = self.conn.lock() {
            if let Err(e) = db::advance_day(&conn) {
                self.status_message = format!("Could not change the date: {e}");
            }
        }
        self.refresh();
    }

    fn handle_create_learner(&mut self) {
        let name = self.new_learner_name.trim().to_string();
        let created = match self.conn.lock() {
            Ok(conn) => db::add_learner(&name, &conn),
            Err(_) => return,
        };

        match created {
            Ok(id) => {
                self.new_learner_name.clear();
                self.reload_learners();
                self.selected_learner_index = self.learners.iter().position(|l| l.id == id);
                self.status_message = format!("Learner '{name}' created.");
            }
            Err(e) => self.status_message = e.to_string(),
        }
        self.refresh();
    }

    fn handle_add_card(&mut self) {
        let Some(learner_id) = self.selected_learner().map(|l| l.id) else {
            return;
        };
        let added = match self.conn.lock() {
            Ok(conn) => db::add_card(
                learner_id,
                &self.current_question,
                &self.current_answer,
                &conn,
            ),
            Err(_) => return,
        };

        match added {
            Ok(_) => {
                self.current_question.clear();
                self.current_answer.clear();
                self.status_message = "Card added to slot 1.".to_string();
            }
            Err(e) => self.status_message = format!("Failed to add card: {e}"),
        }
        self.refresh();
    }

    fn handle_save_edit(&mut self) {
        let Some(edit) = self.editing.take() else {
            return;
        };
        let saved = match self.conn.lock() {
            Ok(conn) => db::edit_card(edit.card_id, &edit.question, &edit.answer, &conn),
            Err(_) => return,
        };

        self.status_message = match saved {
            Ok(_) => "Card updated.".to_string(),
            Err(e) => format!("Failed to update card: {e}"),
        };
        self.refresh();
    }

    fn handle_delete(&mut self, card_id: CardId) {
        let deleted = match self.conn.lock() {
            Ok(conn) => db::delete_card(card_id, &conn),
            Err(_) => return,
        };

        self.status_message = match deleted {
            Ok(()) => "Card deleted.".to_string(),
            Err(e) => format!("Failed to delete card: {e}"),
        };
        if self.editing.as_ref().is_some_and(|edit| edit.card_id == card_id) {
            self.editing = None;
        }
        self.refresh();
    }

    /// Exports the selected learner's cards, progress included, to JSON
    fn handle_export(&mut self) {
        let Some(learner) = self.selected_learner().cloned() else {
            self.status_message = "Select a learner to export.".to_string();
            return;
        };

        // Open file save dialog
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.json", learner.name))
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        let deck = match self.conn.lock() {
            Ok(conn) => db::load_deck(&learner, &conn),
            Err(_) => return,
        };

        self.result_message = match deck {
            Ok(deck) => match export_json_to_path(&deck, &path) {
                Ok(()) => format!(
                    "{} card(s) of '{}' exported successfully!",
                    deck.cards.len(),
                    learner.name
                ),
                Err(e) => format!("Export failed: {e}"),
            },
            Err(e) => format!("Export failed: {e}"),
        };
        self.show_result_dialog = true;
    }

    /// Imports a deck file into the learner it names, creating that
    /// learner when needed
    fn handle_import(&mut self) {
        // Open file selection dialog
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let deck = match import_json(&path) {
            Ok(deck) => deck,
            Err(e) => {
                self.result_message = format!(
                    "Import failed: {e}\n\nPlease check if the file has correct structure:\n{{\n  \"learner\": \"Name\",\n  \"cards\": [{{ \"question\": \"...\", \"answer\": \"...\" }}]\n}}"
                );
                self.show_result_dialog = true;
                return;
            }
        };

        let imported = match self.conn.lock() {
            Ok(conn) => db::import_deck_for_named_learner(&deck, &conn).map(|(_, count)| count),
            Err(_) => return,
        };

        self.result_message = match imported {
            Ok(count) => format!(
                "{} card(s) imported for '{}'!",
                count,
                deck.learner.trim()
            ),
            Err(e) => format!("Import failed: {e}"),
        };
        self.show_result_dialog = true;
        self.reload_learners();
        self.refresh();
    }
}
