pub mod policy;
pub mod prompt;
pub mod session;

pub use policy::{Decision, GRACE_PERIOD_DAYS, decide};
pub use prompt::{ReviewPrompt, TerminalPrompt};
pub use session::{CardReview, PenaltyNotice, Prompt, ReviewSession, SessionSummary, run_session};
