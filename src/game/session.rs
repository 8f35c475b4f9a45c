//! One matching-game session: owns the loaded data, the running state, the
//! clock and the presenter, and routes inputs through the engine.
//!
//! Nothing here is global; any number of sessions can coexist.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;

use super::data::{CardId, GameData};
use super::deck::{Deck, column_labels};
use super::engine::{Ignored, MatchEngine, Transition};
use super::input::{EngineInput, InputAdapter, InputMode, PointerEvent};
use super::presenter::{Outcome, Presenter};
use super::state::{FailReason, MatchState};
use super::timer::GameTimer;
use crate::error::SessionError;

pub struct MatchSession<P: Presenter> {
    presenter: P,
    adapter: InputAdapter,
    data: Option<GameData>, // retained for "restart with same data"
    deck: Deck,
    engine: MatchEngine,
    state: Option<MatchState>,
    timer: GameTimer,
    rng: StdRng,
}

impl<P: Presenter> MatchSession<P> {
    pub fn new(presenter: P, mode: InputMode) -> Self {
        Self::with_rng(presenter, mode, StdRng::from_entropy())
    }

    /// Deterministic shuffles, for tests and replays.
    pub fn with_seed(presenter: P, mode: InputMode, seed: u64) -> Self {
        Self::with_rng(presenter, mode, StdRng::seed_from_u64(seed))
    }

    fn with_rng(presenter: P, mode: InputMode, rng: StdRng) -> Self {
        Self {
            presenter,
            adapter: InputAdapter::new(mode),
            data: None,
            deck: Deck::default(),
            engine: MatchEngine::default(),
            state: None,
            timer: GameTimer::new(),
            rng,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn data(&self) -> Option<&GameData> {
        self.data.as_ref()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    pub fn input_mode(&self) -> InputMode {
        self.adapter.mode()
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.adapter = InputAdapter::new(mode);
    }

    /// Parses, validates and starts. On failure the current game is untouched.
    pub fn load_json(&mut self, text: &str, now: f64) -> Result<(), SessionError> {
        let data = GameData::from_json_str(text).inspect_err(|e| log::warn!("game file rejected: {}", e))?;
        self.start(data, now);
        Ok(())
    }

    pub fn load_value(&mut self, value: &Value, now: f64) -> Result<(), SessionError> {
        let data = GameData::from_value(value).inspect_err(|e| log::warn!("game data rejected: {}", e))?;
        self.start(data, now);
        Ok(())
    }

    /// Starts over with the data of the last successful load, reshuffled.
    pub fn restart(&mut self, now: f64) -> Result<(), SessionError> {
        let data = self.data.take().ok_or(SessionError::NothingLoaded)?;
        self.start(data, now);
        Ok(())
    }

    pub fn start(&mut self, data: GameData, now: f64) {
        let meta = data.meta();
        self.deck = Deck::partition(data.cards(), data.pair_count(), &mut self.rng);
        let state = MatchState::new(self.deck.pair_count());
        self.engine = MatchEngine::new(meta.max_errors);
        self.adapter.reset();

        self.timer.reset();
        self.timer.set_time_limit(meta.time_limit_ms());
        self.timer.start(now);

        let columns = column_labels(meta, data.cards());
        self.presenter.show_header(meta, &columns);
        self.presenter
            .render_deck(self.deck.left(), self.deck.right(), self.deck.pair_count());
        self.presenter.update_score(0, state.total_pairs());
        self.presenter.update_error_count(0);
        self.presenter.update_error_budget(meta.max_errors);
        self.presenter.update_selection(None);
        self.presenter.update_timer(0.0);

        log::info!(
            "game started: {} pairs, budget {:?}, time limit {:?}",
            state.total_pairs(),
            meta.max_errors,
            meta.time_limit_secs
        );
        self.state = Some(state);
        self.data = Some(data);
    }

    /// Raw UI event through the active input adapter.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: f64) -> Transition {
        let selected = self.state.as_ref().and_then(|s| s.selected_concept());
        match self.adapter.translate(event, selected) {
            Some(EngineInput::SelectConcept(id)) => self.select_concept(id, now),
            Some(EngineInput::TargetDefinition(id)) => self.target_definition(id, now),
            None => Transition::Ignored(Ignored::NoSelection),
        }
    }

    pub fn select_concept(&mut self, id: CardId, now: f64) -> Transition {
        let Some(state) = self.state.as_mut() else {
            return Transition::Ignored(Ignored::NoGame);
        };
        let transition = self.engine.select_concept(state, &self.deck, id);
        self.present(transition, now);
        transition
    }

    pub fn target_definition(&mut self, id: CardId, now: f64) -> Transition {
        let Some(state) = self.state.as_mut() else {
            return Transition::Ignored(Ignored::NoGame);
        };
        let transition = self.engine.target_definition(state, &self.deck, id);
        self.present(transition, now);
        transition
    }

    /// Clock step. Returns `TimedOut` on the tick that crosses the limit.
    pub fn tick(&mut self, now: f64) -> Option<Transition> {
        let state = self.state.as_mut()?;
        if state.phase().is_terminal() {
            return None;
        }
        let tick = self.timer.tick(now);
        if tick.display_changed {
            self.presenter.update_timer(tick.elapsed_ms);
        }
        if !tick.expired {
            return None;
        }
        let transition = self.engine.time_expired(state);
        self.present(transition, now);
        Some(transition)
    }

    /// Whether the running game has ended (or none was ever started).
    pub fn is_over(&self) -> bool {
        self.state.as_ref().is_none_or(|s| s.phase().is_terminal())
    }

    fn present(&mut self, transition: Transition, now: f64) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        match transition {
            Transition::Ignored(_) => {}
            Transition::Selected(id) => self.presenter.update_selection(Some(id)),
            Transition::Deselected(_) => self.presenter.update_selection(None),
            Transition::Matched {
                concept,
                definition,
                completed,
            } => {
                let concept_text = self.deck.concept(concept).map_or("", |c| c.content.as_str());
                let definition_text = self
                    .deck
                    .definition(definition)
                    .map_or("", |c| c.content.as_str());
                self.presenter
                    .mark_pair_matched(concept, definition, concept_text, definition_text);
                self.presenter
                    .update_score(state.matched_pairs(), state.total_pairs());
                self.presenter.update_selection(None);
                if completed {
                    self.timer.stop(now);
                    self.presenter
                        .show_outcome(Outcome::Win, self.timer.elapsed_ms(), state.error_count());
                }
            }
            Transition::Mismatched {
                definition,
                counted,
                exhausted,
                ..
            } => {
                self.presenter.flash_error(definition);
                if counted {
                    self.presenter.update_error_count(state.error_count());
                }
                self.presenter.update_selection(None);
                if exhausted {
                    self.timer.stop(now);
                    self.presenter.show_outcome(
                        Outcome::GameOver(FailReason::ErrorsExhausted),
                        self.timer.elapsed_ms(),
                        state.error_count(),
                    );
                }
            }
            Transition::TimedOut => {
                self.timer.stop(now);
                self.presenter.update_selection(None);
                self.presenter.show_outcome(
                    Outcome::GameOver(FailReason::TimeExpired),
                    self.timer.elapsed_ms(),
                    state.error_count(),
                );
            }
        }
    }
}
