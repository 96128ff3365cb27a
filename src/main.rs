mod app;
use leitner_app::*;

use anyhow::Context;
use app::LeitnerApp;
use clap::{Parser, Subcommand};
use database::db;
use rusqlite::Connection;
use scheduler::TerminalPrompt;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "leitner", about = "Leitner box flashcards", version)]
struct Cli {
    /// Config file (default: $LEITNER_CONFIG, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the desktop window (default)
    Gui,

    /// Review due cards in the terminal
    Review {
        #[arg(long)]
        learner: Option<String>,
    },

    /// Show how many cards are in each slot
    #[command(name = "box")]
    ShowBox {
        #[arg(long)]
        learner: Option<String>,
    },

    /// Create a learner profile
    AddLearner { name: String },

    /// Add a card to slot 1
    AddCard {
        #[arg(long)]
        learner: Option<String>,
        question: String,
        answer: String,
    },

    /// Move the app's date one day forward
    NextDay,
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_learner(
    requested: Option<String>,
    config: &Config,
    conn: &Connection,
) -> anyhow::Result<Learner> {
    let name = requested
        .or_else(|| config.learner.clone())
        .context("no learner given: pass --learner or set `learner` in the config file")?;
    Ok(db::require_learner(&name, conn)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.db {
        config.database_path = path;
    }
    init_logging(&config.log_filter);

    let conn = db::open_database(&config.database_path).with_context(|| {
        format!("opening database {}", config.database_path.display())
    })?;

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 720.0]),
                ..Default::default()
            };
            let default_learner = config.learner.clone();
            eframe::run_native(
                "Leitner Box",
                options,
                Box::new(|_cc| Ok(Box::new(LeitnerApp::new(conn, default_learner)))),
            )
            .map_err(|e| anyhow::anyhow!("desktop window failed: {e}"))?;
        }
        Command::Review { learner } => {
            let learner = resolve_learner(learner, &config, &conn)?;
            let today = db::get_current_date(&conn)?;
            let mut prompt = TerminalPrompt::stdio();
            let summary = run_session(&conn, &mut prompt, learner.id, today)?;
            if summary.failed_writes > 0 {
                eprintln!(
                    "{} update(s) could not be saved; those cards keep their previous schedule.",
                    summary.failed_writes
                );
            }
        }
        Command::ShowBox { learner } => {
            let learner = resolve_learner(learner, &config, &conn)?;
            let summary = db::get_box_summary(learner.id, &conn)?;
            println!("=== {}'s Leitner box ===", learner.name);
            for (slot, count) in summary.iter() {
                println!("Slot {slot} → {count} cards");
            }
        }
        Command::AddLearner { name } => {
            db::add_learner(&name, &conn)?;
            println!("Learner '{}' created.", name.trim());
        }
        Command::AddCard {
            learner,
            question,
            answer,
        } => {
            let learner = resolve_learner(learner, &config, &conn)?;
            let id = db::add_card(learner.id, &question, &answer, &conn)?;
            println!("Card {id} added to slot 1.");
        }
        Command::NextDay => {
            let today = db::advance_day(&conn)?;
            println!("Today is now {today}.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_subcommand_parses() {
        let cli = Cli::try_parse_from(["leitner", "box", "--learner", "anna"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::ShowBox { learner: Some(name) }) if name == "anna"
        ));
    }

    #[test]
    fn test_subcommand_names() {
        for args in [
            vec!["leitner", "gui"],
            vec!["leitner", "review"],
            vec!["leitner", "add-learner", "anna"],
            vec!["leitner", "add-card", "kot", "cat"],
            vec!["leitner", "next-day"],
        ] {
            assert!(Cli::try_parse_from(args.clone()).is_ok(), "{args:?}");
        }
        assert!(Cli::try_parse_from(["leitner"]).unwrap().command.is_none());
        assert!(Cli::try_parse_from(["leitner", "show-box"]).is_err());
    }
}
