//! Match/mismatch decisions and the state transitions they cause.
//!
//! ```text
//! Selecting --target--> Resolving --+--> Selecting
//!                                   +--> Completed  (last pair matched)
//!                                   +--> Failed     (error budget spent)
//! any non-terminal --time expired--> Failed
//! ```
//!
//! The engine never talks to the presenter; it returns a `Transition`
//! describing what happened and the session turns that into UI commands.

use super::data::{CardId, ErrorBudget};
use super::deck::Deck;
use super::state::{FailReason, MatchState, Phase};

/// Why an input was dropped without changing state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    NoGame,
    Locked,
    Busy,
    UnknownCard,
    AlreadyMatched,
    NoSelection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Ignored(Ignored),
    Selected(CardId),
    Deselected(CardId),
    Matched {
        concept: CardId,
        definition: CardId,
        completed: bool,
    },
    Mismatched {
        concept: CardId,
        definition: CardId,
        counted: bool,   // false when the budget is unlimited
        exhausted: bool, // this mismatch spent the last allowed error
    },
    TimedOut,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchEngine {
    budget: ErrorBudget,
}

impl MatchEngine {
    pub fn new(budget: ErrorBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> ErrorBudget {
        self.budget
    }

    fn guard(state: &MatchState) -> Option<Ignored> {
        if state.input_locked || state.phase.is_terminal() {
            Some(Ignored::Locked)
        } else if state.phase == Phase::Resolving {
            Some(Ignored::Busy)
        } else {
            None
        }
    }

    /// Selecting the already selected concept toggles it off; selecting a
    /// different one replaces the selection at no cost.
    pub fn select_concept(&self, state: &mut MatchState, deck: &Deck, id: CardId) -> Transition {
        if let Some(reason) = Self::guard(state) {
            return Transition::Ignored(reason);
        }
        if deck.concept(id).is_none() {
            return Transition::Ignored(Ignored::UnknownCard);
        }
        if state.is_matched(id) {
            return Transition::Ignored(Ignored::AlreadyMatched);
        }

        if state.selected_concept == Some(id) {
            state.selected_concept = None;
            log::debug!("concept {} deselected", id);
            Transition::Deselected(id)
        } else {
            state.selected_concept = Some(id);
            log::debug!("concept {} selected", id);
            Transition::Selected(id)
        }
    }

    /// Resolves the current selection against definition `id` as one atomic
    /// step. The selection is cleared after every resolution.
    pub fn target_definition(&self, state: &mut MatchState, deck: &Deck, id: CardId) -> Transition {
        if let Some(reason) = Self::guard(state) {
            return Transition::Ignored(reason);
        }
        let Some(definition) = deck.definition(id) else {
            return Transition::Ignored(Ignored::UnknownCard);
        };
        if state.is_matched(id) {
            return Transition::Ignored(Ignored::AlreadyMatched);
        }
        let Some(concept) = state.selected_concept else {
            return Transition::Ignored(Ignored::NoSelection);
        };

        state.phase = Phase::Resolving;

        let transition = if definition.match_id == concept {
            state.matched.insert(concept);
            state.matched.insert(id);
            state.matched_pairs += 1;
            Transition::Matched {
                concept,
                definition: id,
                completed: state.is_complete(),
            }
        } else {
            let counted = self.budget.limit().is_some();
            if counted {
                state.error_count += 1;
            }
            Transition::Mismatched {
                concept,
                definition: id,
                counted,
                exhausted: self.budget.is_exhausted(state.error_count),
            }
        };

        state.selected_concept = None;
        state.phase = Phase::Selecting;

        match transition {
            Transition::Matched { completed: true, .. } => {
                state.finish(Phase::Completed);
                log::info!("all {} pairs matched", state.total_pairs);
            }
            Transition::Mismatched { exhausted: true, .. } => {
                state.finish(Phase::Failed(FailReason::ErrorsExhausted));
                log::info!("error budget exhausted after {} mistakes", state.error_count);
            }
            _ => log::debug!("resolved definition {}: {:?}", id, transition),
        }
        transition
    }

    /// Timer expiry. Ignored once the game has already ended.
    pub fn time_expired(&self, state: &mut MatchState) -> Transition {
        if state.phase.is_terminal() {
            return Transition::Ignored(Ignored::Locked);
        }
        state.finish(Phase::Failed(FailReason::TimeExpired));
        log::info!("time limit reached with {}/{} pairs", state.matched_pairs, state.total_pairs);
        Transition::TimedOut
    }
}
