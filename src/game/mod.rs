//! Concept/definition matching game.
//!
//! The player picks a card from the left column (click or drag) and targets
//! a card in the right column. Correct pairs are locked in; wrong ones spend
//! the error budget. The game ends when every pair is matched, the budget is
//! exhausted, or the optional time limit runs out.
//!
//! Layering, bottom-up: `data` (validated input) -> `deck` (columns) ->
//! `state` + `engine` (transitions) -> `session` (timer, presenter, restart).

pub mod data;
pub mod deck;
pub mod engine;
pub mod input;
pub mod presenter;
pub mod session;
pub mod state;
pub mod timer;

pub use data::{Card, CardId, ErrorBudget, GameData, GameMeta};
pub use deck::{Deck, column_labels, shuffle};
pub use engine::{Ignored, MatchEngine, Transition};
pub use input::{Column, InputMode, PointerEvent};
pub use presenter::{Outcome, Presenter, RecordingPresenter};
pub use session::MatchSession;
pub use state::{FailReason, MatchState, Phase};
pub use timer::{GameTimer, format_time};
