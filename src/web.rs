//! Browser bridge: `MatchGame` and `FortuneWheel` classes for JS.
//!
//! The page hands each class a plain JS object with presenter methods
//! (`renderDeck`, `markPairMatched`, `renderWheel`, ...). Missing methods are
//! skipped, so a page only implements what it shows. Clocks come from
//! `performance.now()` and `requestAnimationFrame` timestamps, which share an
//! origin.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::game::{
    Card, CardId, Column, ErrorBudget, GameMeta, InputMode, MatchSession, Outcome, PointerEvent, Presenter,
    format_time,
};
use crate::wheel::{self, Segment, WeightedItem, WheelConfig, WheelPresenter, WheelStatus};

// --- Presenter plumbing -------------------------------------------------------

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        log::warn!("could not convert value for JS: {}", e);
        JsValue::UNDEFINED
    })
}

fn id_to_js(id: CardId) -> JsValue {
    JsValue::from_f64(id as f64)
}

/// Calls `target[method](...args)` if such a function exists.
fn call_method(target: &JsValue, method: &str, args: &[JsValue]) {
    let Ok(func) = js_sys::Reflect::get(target, &JsValue::from_str(method)) else {
        return;
    };
    let Some(func) = func.dyn_ref::<js_sys::Function>() else {
        return;
    };
    let args: js_sys::Array = args.iter().collect();
    if let Err(e) = func.apply(target, &args) {
        log::warn!("presenter.{} threw: {:?}", method, e);
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub struct JsPresenter {
    target: JsValue,
}

impl JsPresenter {
    pub fn new(target: JsValue) -> Self {
        Self { target }
    }

    fn call(&self, method: &str, args: &[JsValue]) {
        call_method(&self.target, method, args);
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HeaderView<'a> {
    title: Option<&'a str>,
    description: &'a str,
    columns: &'a [String; 2],
}

impl Presenter for JsPresenter {
    fn show_header(&mut self, meta: &GameMeta, columns: &[String; 2]) {
        let view = HeaderView {
            title: meta.title.as_deref(),
            description: meta.description_or_default(),
            columns,
        };
        self.call("showHeader", &[to_js(&view)]);
    }

    fn render_deck(&mut self, left: &[Card], right: &[Card], pair_count: usize) {
        self.call(
            "renderDeck",
            &[to_js(left), to_js(right), JsValue::from_f64(pair_count as f64)],
        );
    }

    fn update_selection(&mut self, selected: Option<CardId>) {
        self.call("updateSelection", &[selected.map_or(JsValue::NULL, id_to_js)]);
    }

    fn mark_pair_matched(&mut self, concept: CardId, definition: CardId, concept_text: &str, definition_text: &str) {
        self.call(
            "markPairMatched",
            &[
                id_to_js(concept),
                id_to_js(definition),
                JsValue::from_str(concept_text),
                JsValue::from_str(definition_text),
            ],
        );
    }

    fn flash_error(&mut self, definition: CardId) {
        self.call("flashError", &[id_to_js(definition)]);
    }

    fn update_score(&mut self, matched: usize, total: usize) {
        self.call(
            "updateScore",
            &[JsValue::from_f64(matched as f64), JsValue::from_f64(total as f64)],
        );
    }

    fn update_error_count(&mut self, count: u32) {
        self.call("updateErrorCount", &[JsValue::from(count)]);
    }

    fn update_error_budget(&mut self, budget: ErrorBudget) {
        let limit = budget.limit().map_or(JsValue::NULL, JsValue::from);
        self.call("updateErrorBudget", &[limit]);
    }

    fn update_timer(&mut self, elapsed_ms: f64) {
        self.call(
            "updateTimer",
            &[JsValue::from_f64(elapsed_ms), JsValue::from_str(&format_time(elapsed_ms))],
        );
    }

    fn show_outcome(&mut self, outcome: Outcome, elapsed_ms: f64, error_count: u32) {
        self.call(
            "showOutcome",
            &[
                JsValue::from_str(outcome.as_str()),
                JsValue::from_f64(elapsed_ms),
                JsValue::from(error_count),
            ],
        );
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SliceView<'a> {
    text: &'a str,
    weight: f64,
    start_angle: f64,
    end_angle: f64,
}

impl WheelPresenter for JsPresenter {
    fn render_wheel(&mut self, items: &[WeightedItem], segments: &[Segment], rotation: f64) {
        let slices: Vec<SliceView<'_>> = segments
            .iter()
            .filter_map(|s| {
                let item = items.get(s.item_index)?;
                Some(SliceView {
                    text: &item.text,
                    weight: item.weight,
                    start_angle: s.start_angle,
                    end_angle: s.end_angle,
                })
            })
            .collect();
        self.call("renderWheel", &[to_js(&slices), JsValue::from_f64(rotation)]);
    }

    fn show_selected_word(&mut self, word: Option<&str>) {
        self.call("showSelectedWord", &[word.map_or(JsValue::NULL, JsValue::from_str)]);
    }

    fn show_status(&mut self, status: &WheelStatus) {
        self.call("showStatus", &[to_js(status)]);
    }

    fn set_spin_enabled(&mut self, enabled: bool) {
        self.call("setSpinEnabled", &[JsValue::from_bool(enabled)]);
    }
}

// --- Frame loop ---------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(f: &FrameCallback) {
    let Some(w) = web_sys::window() else {
        return;
    };
    if let Some(cb) = f.borrow().as_ref() {
        if let Err(e) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {:?}", e);
        }
    }
}

/// Runs `step` once per animation frame until it returns false. `running`
/// is held true for the lifetime of the loop so callers start at most one.
fn run_frames<F>(running: Rc<Cell<bool>>, mut step: F)
where
    F: FnMut(f64) -> bool + 'static,
{
    if running.replace(true) {
        return;
    }
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if !step(ts) {
            running.set(false);
            let _ = f.borrow_mut().take();
            return;
        }
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

// --- MatchGame ----------------------------------------------------------------

fn card_id(raw: f64) -> Result<CardId, JsValue> {
    if raw.is_finite() && raw.fract() == 0.0 {
        Ok(raw as CardId)
    } else {
        Err(JsValue::from_str("card ids must be integers"))
    }
}

fn column(raw: &str) -> Result<Column, JsValue> {
    match raw {
        "left" => Ok(Column::Left),
        "right" => Ok(Column::Right),
        other => Err(JsValue::from_str(&format!("unknown column `{}`", other))),
    }
}

#[wasm_bindgen]
pub struct MatchGame {
    session: Rc<RefCell<MatchSession<JsPresenter>>>,
    ticking: Rc<Cell<bool>>,
}

impl MatchGame {
    fn with_session<R>(&self, f: impl FnOnce(&mut MatchSession<JsPresenter>) -> R) -> Result<R, JsValue> {
        let mut session = self
            .session
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("game is busy"))?;
        Ok(f(&mut session))
    }

    /// Reads session state; defaults while a presenter callback holds it.
    fn read<R: Default>(&self, f: impl FnOnce(&MatchSession<JsPresenter>) -> R) -> R {
        self.session.try_borrow().map(|s| f(&s)).unwrap_or_default()
    }

    /// Drives the countdown and elapsed-time display until the game ends.
    fn start_clock(&self) {
        let session = self.session.clone();
        run_frames(self.ticking.clone(), move |ts| {
            let Ok(mut s) = session.try_borrow_mut() else {
                return true;
            };
            s.tick(ts);
            !s.is_over()
        });
    }

    fn pointer(&self, event: PointerEvent) -> Result<(), JsValue> {
        let now = performance_now();
        self.with_session(|s| {
            s.handle_pointer(event, now);
        })
    }
}

#[wasm_bindgen]
impl MatchGame {
    /// `presenter` is a JS object; `drag` picks drag-and-drop over clicks.
    #[wasm_bindgen(constructor)]
    pub fn new(presenter: JsValue, drag: bool) -> MatchGame {
        let mode = if drag { InputMode::Drag } else { InputMode::Click };
        MatchGame {
            session: Rc::new(RefCell::new(MatchSession::new(JsPresenter::new(presenter), mode))),
            ticking: Rc::new(Cell::new(false)),
        }
    }

    /// Validates and starts a game from file text. On error the message is
    /// meant for the player and the running game is kept.
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&self, text: &str) -> Result<(), JsValue> {
        let now = performance_now();
        self.with_session(|s| s.load_json(text, now))?
            .map_err(js_error)?;
        self.start_clock();
        Ok(())
    }

    #[wasm_bindgen(js_name = loadSample)]
    pub fn load_sample(&self) -> Result<(), JsValue> {
        self.load_json(&crate::sample_game_json())
    }

    pub fn restart(&self) -> Result<(), JsValue> {
        let now = performance_now();
        self.with_session(|s| s.restart(now))?.map_err(js_error)?;
        self.start_clock();
        Ok(())
    }

    #[wasm_bindgen(js_name = setDragMode)]
    pub fn set_drag_mode(&self, drag: bool) -> Result<(), JsValue> {
        let mode = if drag { InputMode::Drag } else { InputMode::Click };
        self.with_session(|s| s.set_input_mode(mode))
    }

    /// `column` is `"left"` or `"right"`.
    pub fn click(&self, column_name: &str, id: f64) -> Result<(), JsValue> {
        let event = PointerEvent::Click {
            column: column(column_name)?,
            id: card_id(id)?,
        };
        self.pointer(event)
    }

    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&self, id: f64) -> Result<(), JsValue> {
        self.pointer(PointerEvent::DragStart(card_id(id)?))
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&self) -> Result<(), JsValue> {
        self.pointer(PointerEvent::DragEnd)
    }

    #[wasm_bindgen(js_name = drop)]
    pub fn drop_on(&self, id: f64) -> Result<(), JsValue> {
        self.pointer(PointerEvent::Drop(card_id(id)?))
    }

    #[wasm_bindgen(getter, js_name = matchedPairs)]
    pub fn matched_pairs(&self) -> u32 {
        self.read(|s| s.state().map_or(0, |st| st.matched_pairs() as u32))
    }

    #[wasm_bindgen(getter, js_name = totalPairs)]
    pub fn total_pairs(&self) -> u32 {
        self.read(|s| s.state().map_or(0, |st| st.total_pairs() as u32))
    }

    #[wasm_bindgen(getter, js_name = errorCount)]
    pub fn error_count(&self) -> u32 {
        self.read(|s| s.state().map_or(0, |st| st.error_count()))
    }

    #[wasm_bindgen(getter, js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.read(|s| s.is_over())
    }

    #[wasm_bindgen(getter, js_name = elapsedMs)]
    pub fn elapsed_ms(&self) -> f64 {
        self.read(|s| s.timer().elapsed_ms())
    }
}

// --- FortuneWheel -------------------------------------------------------------

#[wasm_bindgen(js_name = FortuneWheel)]
pub struct WheelHandle {
    wheel: Rc<RefCell<wheel::FortuneWheel<JsPresenter>>>,
    animating: Rc<Cell<bool>>,
}

impl WheelHandle {
    fn with_wheel<R>(&self, f: impl FnOnce(&mut wheel::FortuneWheel<JsPresenter>) -> R) -> Result<R, JsValue> {
        let mut w = self
            .wheel
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("wheel is busy"))?;
        Ok(f(&mut w))
    }
}

#[wasm_bindgen(js_class = FortuneWheel)]
impl WheelHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(presenter: JsValue) -> WheelHandle {
        WheelHandle {
            wheel: Rc::new(RefCell::new(wheel::FortuneWheel::new(
                JsPresenter::new(presenter),
                WheelConfig::default(),
            ))),
            animating: Rc::new(Cell::new(false)),
        }
    }

    /// Returns the number of words loaded.
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&self, text: &str) -> Result<u32, JsValue> {
        self.with_wheel(|w| w.load_json(text).map(|()| w.items().len() as u32))?
            .map_err(js_error)
    }

    pub fn spin(&self) -> Result<(), JsValue> {
        let now = performance_now();
        self.with_wheel(|w| w.request_spin(now))?.map_err(js_error)?;
        let wheel = self.wheel.clone();
        run_frames(self.animating.clone(), move |ts| {
            let Ok(mut w) = wheel.try_borrow_mut() else {
                return true;
            };
            w.advance(ts);
            w.is_spinning()
        });
        Ok(())
    }

    /// Removes the last result; returns its text, or `undefined` when
    /// nothing was selected.
    #[wasm_bindgen(js_name = removeSelected)]
    pub fn remove_selected(&self) -> Result<Option<String>, JsValue> {
        let removed = self.with_wheel(|w| w.remove_selected())?.map_err(js_error)?;
        Ok(removed.map(|item| item.text))
    }

    #[wasm_bindgen(getter, js_name = canSpin)]
    pub fn can_spin(&self) -> bool {
        self.wheel.try_borrow().is_ok_and(|w| w.can_spin())
    }

    #[wasm_bindgen(getter, js_name = isSpinning)]
    pub fn is_spinning(&self) -> bool {
        self.wheel.try_borrow().map_or(true, |w| w.is_spinning())
    }

    #[wasm_bindgen(getter, js_name = selectedWord)]
    pub fn selected_word(&self) -> Option<String> {
        self.wheel
            .try_borrow()
            .ok()
            .and_then(|w| w.selected().map(|item| item.text.clone()))
    }
}
