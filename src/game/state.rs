//! Mutable per-game state. Only `MatchEngine` transitions change it.

use std::collections::BTreeSet;

use serde::Serialize;

use super::data::CardId;

/// Why a game ended without a win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailReason {
    ErrorsExhausted,
    TimeExpired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Selecting,
    /// A drop/click is being resolved; no other input is accepted.
    Resolving,
    Completed,
    Failed(FailReason),
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    pub(crate) matched_pairs: usize,
    pub(crate) total_pairs: usize,
    pub(crate) error_count: u32,
    pub(crate) selected_concept: Option<CardId>,
    pub(crate) input_locked: bool,
    pub(crate) phase: Phase,
    // ids of both cards of every matched pair
    pub(crate) matched: BTreeSet<CardId>,
}

impl MatchState {
    pub fn new(total_pairs: usize) -> Self {
        Self {
            matched_pairs: 0,
            total_pairs,
            error_count: 0,
            selected_concept: None,
            input_locked: false,
            phase: Phase::Selecting,
            matched: BTreeSet::new(),
        }
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn selected_concept(&self) -> Option<CardId> {
        self.selected_concept
    }

    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_matched(&self, id: CardId) -> bool {
        self.matched.contains(&id)
    }

    pub fn is_complete(&self) -> bool {
        self.matched_pairs == self.total_pairs
    }

    /// Terminal transition: lock input and drop any pending selection.
    pub(crate) fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        self.input_locked = true;
        self.selected_concept = None;
    }
}
