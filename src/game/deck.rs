//! Splitting a validated card list into the two on-screen columns.

use rand::Rng;

use super::data::{Card, CardId, DEFAULT_COLUMN_NAMES, GameMeta};

const CONCEPT_TYPE: &str = "concept";
const DEFINITION_TYPE: &str = "definition";

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Distinct card types in first-seen order.
pub fn distinct_types(cards: &[Card]) -> Vec<&str> {
    let mut types: Vec<&str> = Vec::new();
    for card in cards {
        if !types.contains(&card.kind.as_str()) {
            types.push(card.kind.as_str());
        }
    }
    types
}

/// Headers for the two columns: explicit metadata wins, then the card types.
pub fn column_labels(meta: &GameMeta, cards: &[Card]) -> [String; 2] {
    if let Some(names) = &meta.column_names {
        return names.clone();
    }
    let types = distinct_types(cards);
    if types.contains(&CONCEPT_TYPE) && types.contains(&DEFINITION_TYPE) {
        return ["Concepts".to_string(), "Definitions".to_string()];
    }
    match types.as_slice() {
        [first, second, ..] => [first.to_string(), second.to_string()],
        _ => DEFAULT_COLUMN_NAMES.map(str::to_string),
    }
}

/// The two shuffled columns actually rendered. Row `i` on the left and row
/// `i` on the right are unrelated; pairs are resolved through `match_id`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deck {
    left: Vec<Card>,
    right: Vec<Card>,
}

impl Deck {
    /// Groups by type (concept/definition first, then first two types seen,
    /// then a positional split of a shuffled copy), shuffles each group and
    /// keeps `min(requested_pairs, |left|, |right|)` rows per column.
    ///
    /// Every rendered pair is matchable only when each pair has one card of
    /// each grouped type. The positional split of a single-type deck and the
    /// truncation of lopsided columns can leave a pair with both cards in one
    /// column, or with one card dropped; such a game cannot be completed and
    /// only ends on the error budget or the time limit.
    pub fn partition<R: Rng + ?Sized>(cards: &[Card], requested_pairs: usize, rng: &mut R) -> Self {
        let types = distinct_types(cards);
        let by_type = |kind: &str| -> Vec<Card> {
            cards.iter().filter(|c| c.kind == kind).cloned().collect()
        };

        let (mut left, mut right) =
            if types.contains(&CONCEPT_TYPE) && types.contains(&DEFINITION_TYPE) {
                (by_type(CONCEPT_TYPE), by_type(DEFINITION_TYPE))
            } else if types.len() >= 2 {
                (by_type(types[0]), by_type(types[1]))
            } else {
                let mut all = cards.to_vec();
                shuffle(&mut all, rng);
                let right = all.split_off(all.len() / 2);
                (all, right)
            };

        shuffle(&mut left, rng);
        shuffle(&mut right, rng);

        let rows = requested_pairs.min(left.len()).min(right.len());
        left.truncate(rows);
        right.truncate(rows);
        Self { left, right }
    }

    pub fn left(&self) -> &[Card] {
        &self.left
    }

    pub fn right(&self) -> &[Card] {
        &self.right
    }

    pub fn pair_count(&self) -> usize {
        self.left.len()
    }

    pub fn concept(&self, id: CardId) -> Option<&Card> {
        self.left.iter().find(|c| c.id == id)
    }

    pub fn definition(&self, id: CardId) -> Option<&Card> {
        self.right.iter().find(|c| c.id == id)
    }
}
