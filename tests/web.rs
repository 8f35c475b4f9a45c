// Browser tests for the JS bridge. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use concept_match::{MatchGame, WheelHandle};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn empty_presenter() -> JsValue {
    js_sys::Object::new().into()
}

#[wasm_bindgen_test]
fn match_game_plays_sample_deck() {
    let game = MatchGame::new(empty_presenter(), false);
    game.load_sample().unwrap();
    assert_eq!(game.total_pairs(), 6);
    game.click("left", 1.0).unwrap();
    game.click("right", 2.0).unwrap();
    assert_eq!(game.matched_pairs(), 1);
    assert!(!game.is_over());
}

#[wasm_bindgen_test]
fn match_game_reports_bad_input() {
    let game = MatchGame::new(empty_presenter(), true);
    assert!(game.load_json("{}").is_err());
    assert!(game.restart().is_err());
    assert!(game.click("middle", 1.0).is_err());
    assert!(game.drag_start(1.5).is_err());
}

#[wasm_bindgen_test]
fn wheel_loads_and_spins() {
    let wheel = WheelHandle::new(empty_presenter());
    assert!(!wheel.can_spin());
    assert_eq!(wheel.load_json(r#"["a", "b", "c"]"#).unwrap(), 3);
    assert!(wheel.can_spin());
    wheel.spin().unwrap();
    assert!(wheel.is_spinning());
    assert!(wheel.spin().is_err());
}
