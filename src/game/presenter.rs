//! Contract between the matching core and whatever draws it.
//!
//! The core only pushes commands; it never reads anything back.

use serde::Serialize;

use super::data::{Card, CardId, ErrorBudget, GameMeta};
use super::state::FailReason;

/// How long a definition card shows the mismatch highlight.
pub const ERROR_FLASH_MS: f64 = 700.0;
/// Suggested delay before showing the win dialog.
pub const WIN_DIALOG_DELAY_MS: f64 = 500.0;
/// Suggested delay before showing the game-over dialog.
pub const LOSS_DIALOG_DELAY_MS: f64 = 700.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Win,
    GameOver(FailReason),
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::GameOver(_) => "game-over",
        }
    }
}

pub trait Presenter {
    /// Header shown above the board when a game starts.
    fn show_header(&mut self, _meta: &GameMeta, _columns: &[String; 2]) {}

    fn render_deck(&mut self, left: &[Card], right: &[Card], pair_count: usize);

    fn update_selection(&mut self, _selected: Option<CardId>) {}

    fn mark_pair_matched(
        &mut self,
        concept: CardId,
        definition: CardId,
        concept_text: &str,
        definition_text: &str,
    );

    fn flash_error(&mut self, definition: CardId);

    fn update_score(&mut self, matched: usize, total: usize);

    fn update_error_count(&mut self, count: u32);

    /// Sent on start; an unlimited budget usually hides the error counter.
    fn update_error_budget(&mut self, _budget: ErrorBudget) {}

    fn update_timer(&mut self, _elapsed_ms: f64) {}

    fn show_outcome(&mut self, outcome: Outcome, elapsed_ms: f64, error_count: u32);
}

/// Presenter that records every call, for tests and headless runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingPresenter {
    pub calls: Vec<PresenterCall>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PresenterCall {
    Header { title: Option<String>, columns: [String; 2] },
    RenderDeck { left: Vec<CardId>, right: Vec<CardId>, pair_count: usize },
    Selection(Option<CardId>),
    Matched { concept: CardId, definition: CardId, concept_text: String, definition_text: String },
    FlashError(CardId),
    Score { matched: usize, total: usize },
    ErrorCount(u32),
    ErrorBudget(ErrorBudget),
    Timer(f64),
    Outcome { outcome: Outcome, elapsed_ms: f64, error_count: u32 },
}

impl RecordingPresenter {
    pub fn take(&mut self) -> Vec<PresenterCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresenterCall::Outcome { outcome, .. } => Some(*outcome),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn show_header(&mut self, meta: &GameMeta, columns: &[String; 2]) {
        self.calls.push(PresenterCall::Header {
            title: meta.title.clone(),
            columns: columns.clone(),
        });
    }

    fn render_deck(&mut self, left: &[Card], right: &[Card], pair_count: usize) {
        self.calls.push(PresenterCall::RenderDeck {
            left: left.iter().map(|c| c.id).collect(),
            right: right.iter().map(|c| c.id).collect(),
            pair_count,
        });
    }

    fn update_selection(&mut self, selected: Option<CardId>) {
        self.calls.push(PresenterCall::Selection(selected));
    }

    fn mark_pair_matched(
        &mut self,
        concept: CardId,
        definition: CardId,
        concept_text: &str,
        definition_text: &str,
    ) {
        self.calls.push(PresenterCall::Matched {
            concept,
            definition,
            concept_text: concept_text.to_string(),
            definition_text: definition_text.to_string(),
        });
    }

    fn flash_error(&mut self, definition: CardId) {
        self.calls.push(PresenterCall::FlashError(definition));
    }

    fn update_score(&mut self, matched: usize, total: usize) {
        self.calls.push(PresenterCall::Score { matched, total });
    }

    fn update_error_count(&mut self, count: u32) {
        self.calls.push(PresenterCall::ErrorCount(count));
    }

    fn update_error_budget(&mut self, budget: ErrorBudget) {
        self.calls.push(PresenterCall::ErrorBudget(budget));
    }

    fn update_timer(&mut self, elapsed_ms: f64) {
        self.calls.push(PresenterCall::Timer(elapsed_ms));
    }

    fn show_outcome(&mut self, outcome: Outcome, elapsed_ms: f64, error_count: u32) {
        self.calls.push(PresenterCall::Outcome {
            outcome,
            elapsed_ms,
            error_count,
        });
    }
}
