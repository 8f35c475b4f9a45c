// Integration tests for the bundled sample deck.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::{HashMap, HashSet};

use concept_match::{SAMPLE_CARDS, sample_game_json};
use concept_match::game::GameData;

#[test]
fn sample_cards_have_unique_ids_and_text() {
    let mut seen = HashSet::new();
    for (id, kind, content, _) in SAMPLE_CARDS {
        assert!(seen.insert(*id), "duplicate id {} in SAMPLE_CARDS", id);
        assert!(!content.trim().is_empty(), "empty content for card {}", id);
        assert!(
            *kind == "concept" || *kind == "definition",
            "card {} has unexpected type '{}'",
            id,
            kind
        );
    }
    assert_eq!(SAMPLE_CARDS.len() % 2, 0, "sample deck must have an even card count");
}

#[test]
fn sample_pairs_are_symmetric_and_cross_type() {
    let by_id: HashMap<i64, (&str, i64)> = SAMPLE_CARDS
        .iter()
        .map(|(id, kind, _, match_id)| (*id, (*kind, *match_id)))
        .collect();
    for (id, kind, _, match_id) in SAMPLE_CARDS {
        assert_ne!(id, match_id, "card {} matches itself", id);
        let (other_kind, back) = by_id[match_id];
        assert_eq!(back, *id, "card {} -> {} is not matched back", id, match_id);
        assert_ne!(other_kind, *kind, "pair {}/{} has the same type on both sides", id, match_id);
    }
}

#[test]
fn sample_json_passes_validation() {
    let data = GameData::from_json_str(&sample_game_json()).expect("sample deck should load");
    assert_eq!(data.cards().len(), SAMPLE_CARDS.len());
    assert_eq!(data.pair_count(), SAMPLE_CARDS.len() / 2);
    assert!(data.meta().title.is_none());
}
