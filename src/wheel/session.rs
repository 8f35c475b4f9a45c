//! Fortune wheel: loaded words, their slices, the spin in flight and the
//! last result. Driven by `now` timestamps from the frame loop.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::Value;

use super::items::{WeightedItem, parse_items, parse_items_str};
use super::segments::{Segment, build_segments};
use super::spin::{SpinAnimation, SpinResolver, WheelConfig, pick_weighted};
use crate::error::WheelError;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WheelStatus {
    Loaded { count: usize },
    Removed { word: String, remaining: usize },
    /// Every word was removed; spinning stays disabled until the next load.
    Exhausted,
}

pub trait WheelPresenter {
    fn render_wheel(&mut self, items: &[WeightedItem], segments: &[Segment], rotation: f64);

    /// `None` clears the result display.
    fn show_selected_word(&mut self, word: Option<&str>);

    fn show_status(&mut self, _status: &WheelStatus) {}

    fn set_spin_enabled(&mut self, _enabled: bool) {}
}

#[derive(Clone, Copy, Debug)]
struct ActiveSpin {
    animation: SpinAnimation,
    target: usize,
    started_at: f64,
}

pub struct FortuneWheel<P: WheelPresenter> {
    presenter: P,
    items: Vec<WeightedItem>,
    segments: Vec<Segment>,
    selected: Option<usize>,
    spin: Option<ActiveSpin>,
    rotation: f64,
    config: WheelConfig,
    rng: StdRng,
}

impl<P: WheelPresenter> FortuneWheel<P> {
    pub fn new(presenter: P, config: WheelConfig) -> Self {
        Self::with_rng(presenter, config, StdRng::from_entropy())
    }

    pub fn with_seed(presenter: P, config: WheelConfig, seed: u64) -> Self {
        Self::with_rng(presenter, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(presenter: P, config: WheelConfig, rng: StdRng) -> Self {
        Self {
            presenter,
            items: Vec::new(),
            segments: Vec::new(),
            selected: None,
            spin: None,
            rotation: 0.0,
            config,
            rng,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn items(&self) -> &[WeightedItem] {
        &self.items
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn config(&self) -> WheelConfig {
        self.config
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn selected(&self) -> Option<&WeightedItem> {
        self.selected.and_then(|i| self.items.get(i))
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    pub fn can_spin(&self) -> bool {
        !self.is_spinning() && !self.items.is_empty()
    }

    pub fn load_json(&mut self, text: &str) -> Result<(), WheelError> {
        self.ensure_idle()?;
        let items = parse_items_str(text).inspect_err(|e| log::warn!("wheel file rejected: {}", e))?;
        self.set_items(items);
        Ok(())
    }

    pub fn load_value(&mut self, value: &Value) -> Result<(), WheelError> {
        self.ensure_idle()?;
        let items = parse_items(value).inspect_err(|e| log::warn!("wheel data rejected: {}", e))?;
        self.set_items(items);
        Ok(())
    }

    pub fn set_items(&mut self, items: Vec<WeightedItem>) {
        log::info!("wheel loaded with {} words", items.len());
        self.items = items;
        self.selected = None;
        self.rebuild();
        self.presenter.show_selected_word(None);
        let count = self.items.len();
        self.presenter.show_status(&WheelStatus::Loaded { count });
        self.presenter.set_spin_enabled(self.can_spin());
    }

    /// Picks a weighted target and starts the animation toward it.
    pub fn request_spin(&mut self, now: f64) -> Result<(), WheelError> {
        self.ensure_idle()?;
        let target = pick_weighted(&self.items, &mut self.rng).ok_or(WheelError::Empty)?;
        let turns = self.config.pick_turns(&mut self.rng);
        let total = SpinResolver::new(&self.segments)
            .forward(target, turns)
            .ok_or(WheelError::Empty)?;

        log::debug!("spinning toward item {} with {} turns", target, turns);
        self.spin = Some(ActiveSpin {
            animation: SpinAnimation::new(total, self.config.spin_duration_ms),
            target,
            started_at: now,
        });
        self.rotation = 0.0;
        self.selected = None;
        self.presenter.show_selected_word(None);
        self.presenter.set_spin_enabled(false);
        Ok(())
    }

    /// Frame step. Returns the landed item index on the frame the spin ends.
    pub fn advance(&mut self, now: f64) -> Option<usize> {
        let spin = self.spin.as_mut()?;
        self.rotation = spin.animation.advance(now - spin.started_at);
        let finished = spin.animation.is_finished();
        let target = spin.target;
        self.presenter
            .render_wheel(&self.items, &self.segments, self.rotation);
        if !finished {
            return None;
        }

        self.spin = None;
        let landed = SpinResolver::new(&self.segments).resolve(self.rotation);
        if landed != Some(target) {
            log::error!("spin aimed at {} but landed on {:?}", target, landed);
        }
        self.selected = landed;
        if let Some(item) = self.selected() {
            log::info!("wheel landed on {:?}", item.text);
            let text = item.text.clone();
            self.presenter.show_selected_word(Some(&text));
        }
        self.presenter.set_spin_enabled(self.can_spin());
        landed
    }

    /// Drops the last result from the wheel and redraws it at rest.
    /// Returns the removed word, or `None` when nothing was selected.
    pub fn remove_selected(&mut self) -> Result<Option<WeightedItem>, WheelError> {
        self.ensure_idle()?;
        let Some(index) = self.selected.take() else {
            return Ok(None);
        };
        if index >= self.items.len() {
            return Ok(None);
        }
        let removed = self.items.remove(index);
        self.rotation = 0.0;
        self.rebuild();
        self.presenter.show_selected_word(None);

        let remaining = self.items.len();
        log::info!("removed {:?} from the wheel, {} left", removed.text, remaining);
        let status = if remaining == 0 {
            WheelStatus::Exhausted
        } else {
            WheelStatus::Removed {
                word: removed.text.clone(),
                remaining,
            }
        };
        self.presenter.show_status(&status);
        self.presenter.set_spin_enabled(self.can_spin());
        Ok(Some(removed))
    }

    fn ensure_idle(&self) -> Result<(), WheelError> {
        if self.is_spinning() {
            return Err(WheelError::AlreadySpinning);
        }
        Ok(())
    }

    fn rebuild(&mut self) {
        self.segments = build_segments(self.items.iter().enumerate().map(|(i, item)| (i, item.weight)));
        self.presenter
            .render_wheel(&self.items, &self.segments, self.rotation);
    }
}

/// Wheel presenter that records every call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingWheelPresenter {
    pub calls: Vec<WheelCall>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WheelCall {
    Render { words: Vec<String>, rotation: f64 },
    Selected(Option<String>),
    Status(WheelStatus),
    SpinEnabled(bool),
}

impl RecordingWheelPresenter {
    pub fn take(&mut self) -> Vec<WheelCall> {
        std::mem::take(&mut self.calls)
    }
}

impl WheelPresenter for RecordingWheelPresenter {
    fn render_wheel(&mut self, items: &[WeightedItem], _segments: &[Segment], rotation: f64) {
        self.calls.push(WheelCall::Render {
            words: items.iter().map(|i| i.text.clone()).collect(),
            rotation,
        });
    }

    fn show_selected_word(&mut self, word: Option<&str>) {
        self.calls.push(WheelCall::Selected(word.map(str::to_string)));
    }

    fn show_status(&mut self, status: &WheelStatus) {
        self.calls.push(WheelCall::Status(status.clone()));
    }

    fn set_spin_enabled(&mut self, enabled: bool) {
        self.calls.push(WheelCall::SpinEnabled(enabled));
    }
}
