//! Concept Match core crate.
//!
//! Two browser games share this crate: a concept/definition matching game
//! (`game`) and a weighted fortune wheel (`wheel`). Both cores are plain Rust
//! driven by explicit inputs and timestamps; `web` wires them to JS
//! presenter objects and the animation-frame clock.

use wasm_bindgen::prelude::*;

pub mod error;
pub mod game;
pub mod wheel;
mod web;

pub use web::{JsPresenter, MatchGame, WheelHandle};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    console_log::init_with_level(log::Level::Debug).ok();
    log::info!("concept-match initialized");
}

// -----------------------------------------------------------------------------
// Bundled sample deck: (id, type, content, matchId).
// Loaded only on request; a game never starts by itself.
// -----------------------------------------------------------------------------

pub const SAMPLE_CARDS: &[(i64, &str, &str, i64)] = &[
    (1, "concept", "HTML", 2),
    (2, "definition", "Markup language that gives a web page its structure.", 1),
    (3, "concept", "CSS", 4),
    (4, "definition", "Describes the look and layout of a document written in HTML.", 3),
    (5, "concept", "JavaScript", 6),
    (6, "definition", "Programming language that makes web pages interactive.", 5),
    (7, "concept", "Git", 8),
    (8, "definition", "Version control system that tracks changes to code.", 7),
    (9, "concept", "Database", 10),
    (10, "definition", "Structured storage for organizing and managing data.", 9),
    (11, "concept", "API", 12),
    (12, "definition", "Interface that lets two programs talk to each other.", 11),
];

/// The sample deck in the legacy card-array file format.
pub fn sample_game_json() -> String {
    let cards: Vec<serde_json::Value> = SAMPLE_CARDS
        .iter()
        .map(|&(id, kind, content, match_id)| {
            serde_json::json!({ "id": id, "type": kind, "content": content, "matchId": match_id })
        })
        .collect();
    serde_json::Value::Array(cards).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameData;

    #[test]
    fn test_sample_deck_loads() {
        let data = GameData::from_json_str(&sample_game_json()).unwrap();
        assert_eq!(data.pair_count(), 6);
        assert_eq!(data.card(9).map(|c| c.content.as_str()), Some("Database"));
    }
}
