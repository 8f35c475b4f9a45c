//! Loaded game content: cards plus metadata, validated and normalized from
//! user-supplied JSON.
//!
//! Two file shapes are accepted:
//! - legacy: a flat array of cards
//! - current: `{ "meta": { .. }, "cards": [ .. ] }`
//!
//! Validation walks the raw `serde_json::Value` instead of deriving
//! `Deserialize` so every rejection can name the card and field at fault.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::LoadError;

/// Identifier of a card; `match_id` refers to the counterpart's `id`.
pub type CardId = i64;

/// Error budget applied when the file does not specify one.
pub const DEFAULT_MAX_ERRORS: u32 = 5;
/// Column labels used when neither metadata nor card types provide any.
pub const DEFAULT_COLUMN_NAMES: [&str; 2] = ["Left", "Right"];
/// Prompt shown when the file carries no description.
pub const DEFAULT_DESCRIPTION: &str =
    "Drag the cards on the left onto their matching cards on the right.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub match_id: CardId,
}

/// How many mismatches a player may make before the game is lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "limit", rename_all = "camelCase")]
pub enum ErrorBudget {
    Limited(u32),
    /// `maxErrors: 0` in the file: mismatches are never penalised.
    Unlimited,
}

impl Default for ErrorBudget {
    fn default() -> Self {
        ErrorBudget::Limited(DEFAULT_MAX_ERRORS)
    }
}

impl ErrorBudget {
    /// Normalizes the raw `maxErrors` number. Fractional budgets round up, so
    /// `2.5` allows two mistakes and fails on the third.
    pub fn from_raw(raw: f64) -> Self {
        if raw <= 0.0 {
            ErrorBudget::Unlimited
        } else {
            ErrorBudget::Limited(raw.ceil().min(u32::MAX as f64) as u32)
        }
    }

    pub fn limit(self) -> Option<u32> {
        match self {
            ErrorBudget::Limited(n) => Some(n),
            ErrorBudget::Unlimited => None,
        }
    }

    pub fn is_exhausted(self, errors: u32) -> bool {
        matches!(self, ErrorBudget::Limited(n) if errors >= n)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub column_names: Option<[String; 2]>,
    /// Seconds; `None` when absent or zero in the file.
    pub time_limit_secs: Option<f64>,
    pub max_errors: ErrorBudget,
}

impl GameMeta {
    pub fn time_limit_ms(&self) -> Option<f64> {
        self.time_limit_secs.map(|secs| secs * 1000.0)
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }
}

/// A validated game. Immutable for the lifetime of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct GameData {
    meta: GameMeta,
    cards: Vec<Card>,
}

impl GameData {
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Validates either accepted shape. The input is only read.
    pub fn from_value(value: &Value) -> Result<Self, LoadError> {
        let (meta, raw_cards) = match value {
            Value::Array(items) => (GameMeta::default(), items),
            Value::Object(obj) => {
                let cards = match obj.get("cards") {
                    None | Some(Value::Null) => return Err(LoadError::MissingCards),
                    Some(Value::Array(items)) => items,
                    Some(_) => return Err(LoadError::CardsNotArray),
                };
                (parse_meta(obj.get("meta"))?, cards)
            }
            _ => return Err(LoadError::NotAnObjectOrArray),
        };

        if raw_cards.is_empty() {
            return Err(LoadError::EmptyDeck);
        }
        if raw_cards.len() % 2 != 0 {
            return Err(LoadError::OddDeck(raw_cards.len()));
        }

        let cards = raw_cards
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_card(index, raw))
            .collect::<Result<Vec<_>, _>>()?;
        check_pairing(&cards)?;

        Ok(Self { meta, cards })
    }

    pub fn meta(&self) -> &GameMeta {
        &self.meta
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }
}

// --- Field parsing -----------------------------------------------------------

fn parse_card(index: usize, raw: &Value) -> Result<Card, LoadError> {
    let obj = raw
        .as_object()
        .ok_or(LoadError::CardNotObject { index })?;

    Ok(Card {
        id: id_field(obj, index, "id")?,
        kind: text_field(obj, index, "type")?,
        content: text_field(obj, index, "content")?,
        match_id: id_field(obj, index, "matchId")?,
    })
}

fn id_field(obj: &Map<String, Value>, index: usize, field: &'static str) -> Result<CardId, LoadError> {
    let value = match obj.get(field) {
        None | Some(Value::Null) => return Err(LoadError::MissingField { index, field }),
        Some(v) => v,
    };
    as_integer(value).ok_or(LoadError::InvalidField {
        index,
        field,
        expected: "an integer",
    })
}

fn text_field(obj: &Map<String, Value>, index: usize, field: &'static str) -> Result<String, LoadError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(LoadError::MissingField { index, field }),
        Some(Value::String(s)) if s.is_empty() => Err(LoadError::MissingField { index, field }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(LoadError::InvalidField {
            index,
            field,
            expected: "a non-blank string",
        }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(LoadError::InvalidField {
            index,
            field,
            expected: "a string",
        }),
    }
}

// JSON has a single number type; `2.0` is accepted as an id, `2.5` is not.
fn as_integer(value: &Value) -> Option<CardId> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    // i64::MAX rounds up to 2^63 as f64, which is already out of range.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_meta(raw: Option<&Value>) -> Result<GameMeta, LoadError> {
    let obj = match raw {
        None | Some(Value::Null) => return Ok(GameMeta::default()),
        Some(Value::Object(obj)) => obj,
        Some(_) => return Err(LoadError::InvalidMeta),
    };

    let column_names = match obj.get("columnNames") {
        None | Some(Value::Null) => None,
        Some(Value::Array(names)) => match names.as_slice() {
            [Value::String(left), Value::String(right)] => Some([left.clone(), right.clone()]),
            _ => return Err(LoadError::InvalidColumnNames),
        },
        Some(_) => return Err(LoadError::InvalidColumnNames),
    };

    let time_limit_secs = non_negative(obj, "timeLimit")?.filter(|secs| *secs > 0.0);
    let max_errors = non_negative(obj, "maxErrors")?
        .map(ErrorBudget::from_raw)
        .unwrap_or_default();

    Ok(GameMeta {
        title: optional_text(obj, "title")?,
        description: optional_text(obj, "description")?,
        column_names,
        time_limit_secs,
        max_errors,
    })
}

fn optional_text(obj: &Map<String, Value>, field: &'static str) -> Result<Option<String>, LoadError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(LoadError::InvalidText { field }),
    }
}

fn non_negative(obj: &Map<String, Value>, field: &'static str) -> Result<Option<f64>, LoadError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => match v.as_f64() {
            Some(n) if n >= 0.0 => Ok(Some(n)),
            _ => Err(LoadError::InvalidNumber { field }),
        },
    }
}

/// Every card must have exactly one counterpart, and the relation must be
/// symmetric. With unique ids this partitions the deck into `n / 2` pairs.
fn check_pairing(cards: &[Card]) -> Result<(), LoadError> {
    let mut by_id: HashMap<CardId, &Card> = HashMap::with_capacity(cards.len());
    for card in cards {
        if by_id.insert(card.id, card).is_some() {
            return Err(LoadError::DuplicateId(card.id));
        }
    }

    for card in cards {
        if card.match_id == card.id {
            return Err(LoadError::SelfMatch(card.id));
        }
        let partner = by_id.get(&card.match_id).ok_or(LoadError::UnknownMatch {
            id: card.id,
            match_id: card.match_id,
        })?;
        if partner.match_id != card.id {
            return Err(LoadError::AsymmetricMatch {
                id: card.id,
                match_id: card.match_id,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_deck() -> Value {
        json!([
            { "id": 1, "type": "concept", "content": "A", "matchId": 2 },
            { "id": 2, "type": "definition", "content": "a", "matchId": 1 },
            { "id": 3, "type": "concept", "content": "B", "matchId": 4 },
            { "id": 4, "type": "definition", "content": "b", "matchId": 3 },
        ])
    }

    #[test]
    fn test_legacy_array_gets_default_meta() {
        let data = GameData::from_value(&legacy_deck()).unwrap();
        assert_eq!(data.cards().len(), 4);
        assert_eq!(data.pair_count(), 2);
        assert_eq!(data.meta().max_errors, ErrorBudget::Limited(5));
        assert_eq!(data.meta().time_limit_secs, None);
        assert_eq!(data.meta().column_names, None);
    }

    #[test]
    fn test_current_shape_reads_meta() {
        let raw = json!({
            "meta": {
                "title": "Web basics",
                "columnNames": ["Term", "Meaning"],
                "timeLimit": 90,
                "maxErrors": 3
            },
            "cards": legacy_deck(),
        });
        let data = GameData::from_value(&raw).unwrap();
        let meta = data.meta();
        assert_eq!(meta.title.as_deref(), Some("Web basics"));
        assert_eq!(meta.column_names, Some(["Term".to_string(), "Meaning".to_string()]));
        assert_eq!(meta.time_limit_ms(), Some(90_000.0));
        assert_eq!(meta.max_errors, ErrorBudget::Limited(3));
        assert_eq!(meta.description_or_default(), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_zero_limits_mean_unlimited() {
        let raw = json!({ "meta": { "timeLimit": 0, "maxErrors": 0 }, "cards": legacy_deck() });
        let data = GameData::from_value(&raw).unwrap();
        assert_eq!(data.meta().time_limit_secs, None);
        assert_eq!(data.meta().max_errors, ErrorBudget::Unlimited);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = legacy_deck();
        let before = raw.clone();
        GameData::from_value(&raw).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(
            GameData::from_value(&json!("cards")),
            Err(LoadError::NotAnObjectOrArray)
        ));
        assert!(matches!(
            GameData::from_value(&json!({ "meta": {} })),
            Err(LoadError::MissingCards)
        ));
        assert!(matches!(
            GameData::from_value(&json!({ "cards": {} })),
            Err(LoadError::CardsNotArray)
        ));
        assert!(matches!(GameData::from_value(&json!([])), Err(LoadError::EmptyDeck)));
        let mut odd = legacy_deck();
        odd.as_array_mut().unwrap().pop();
        assert!(matches!(GameData::from_value(&odd), Err(LoadError::OddDeck(3))));
    }

    #[test]
    fn test_card_field_errors() {
        let raw = json!([
            { "id": 1, "type": "concept", "content": "A", "matchId": 2 },
            { "id": 2, "type": "definition", "matchId": 1 },
        ]);
        assert!(matches!(
            GameData::from_value(&raw),
            Err(LoadError::MissingField { index: 1, field: "content" })
        ));

        let raw = json!([
            { "id": "1", "type": "concept", "content": "A", "matchId": 2 },
            { "id": 2, "type": "definition", "content": "a", "matchId": 1 },
        ]);
        assert!(matches!(
            GameData::from_value(&raw),
            Err(LoadError::InvalidField { index: 0, field: "id", .. })
        ));
    }

    #[test]
    fn test_meta_errors() {
        let bad_columns = json!({ "meta": { "columnNames": ["only one"] }, "cards": legacy_deck() });
        assert!(matches!(
            GameData::from_value(&bad_columns),
            Err(LoadError::InvalidColumnNames)
        ));
        let bad_limit = json!({ "meta": { "timeLimit": -5 }, "cards": legacy_deck() });
        assert!(matches!(
            GameData::from_value(&bad_limit),
            Err(LoadError::InvalidNumber { field: "timeLimit" })
        ));
        let bad_errors = json!({ "meta": { "maxErrors": "3" }, "cards": legacy_deck() });
        assert!(matches!(
            GameData::from_value(&bad_errors),
            Err(LoadError::InvalidNumber { field: "maxErrors" })
        ));
    }

    #[test]
    fn test_pairing_must_be_mutual() {
        let raw = json!([
            { "id": 1, "type": "concept", "content": "A", "matchId": 2 },
            { "id": 2, "type": "definition", "content": "a", "matchId": 3 },
            { "id": 3, "type": "concept", "content": "B", "matchId": 2 },
            { "id": 4, "type": "definition", "content": "b", "matchId": 3 },
        ]);
        assert!(matches!(
            GameData::from_value(&raw),
            Err(LoadError::AsymmetricMatch { id: 1, match_id: 2 })
        ));

        let raw = json!([
            { "id": 1, "type": "concept", "content": "A", "matchId": 9 },
            { "id": 2, "type": "definition", "content": "a", "matchId": 1 },
        ]);
        assert!(matches!(
            GameData::from_value(&raw),
            Err(LoadError::UnknownMatch { id: 1, match_id: 9 })
        ));

        let raw = json!([
            { "id": 1, "type": "concept", "content": "A", "matchId": 2 },
            { "id": 1, "type": "definition", "content": "a", "matchId": 1 },
        ]);
        assert!(matches!(GameData::from_value(&raw), Err(LoadError::DuplicateId(1))));
    }

    #[test]
    fn test_integral_float_ids_are_accepted() {
        let raw = json!([
            { "id": 1.0, "type": "concept", "content": "A", "matchId": 2 },
            { "id": 2, "type": "definition", "content": "a", "matchId": 1.0 },
        ]);
        let data = GameData::from_value(&raw).unwrap();
        assert_eq!(data.card(1).map(|c| c.match_id), Some(2));
    }

    #[test]
    fn test_blank_text_is_invalid_not_missing() {
        let raw = json!([
            { "id": 1, "type": "concept", "content": "   ", "matchId": 2 },
            { "id": 2, "type": "definition", "content": "a", "matchId": 1 },
        ]);
        assert!(matches!(
            GameData::from_value(&raw),
            Err(LoadError::InvalidField { index: 0, field: "content", .. })
        ));

        let raw = json!([
            { "id": 1, "type": "", "content": "A", "matchId": 2 },
            { "id": 2, "type": "definition", "content": "a", "matchId": 1 },
        ]);
        assert!(matches!(
            GameData::from_value(&raw),
            Err(LoadError::MissingField { index: 0, field: "type" })
        ));
    }

    #[test]
    fn test_ids_beyond_i64_are_rejected() {
        let raw = json!([
            { "id": 9.223372036854776e18, "type": "concept", "content": "A", "matchId": 2 },
            { "id": 2, "type": "definition", "content": "a", "matchId": 1 },
        ]);
        assert!(matches!(
            GameData::from_value(&raw),
            Err(LoadError::InvalidField { index: 0, field: "id", .. })
        ));
        assert_eq!(as_integer(&json!(-9.223372036854776e18)), Some(i64::MIN));
        assert_eq!(as_integer(&json!(i64::MAX)), Some(i64::MAX));
    }

    #[test]
    fn test_fractional_budget_rounds_up() {
        assert_eq!(ErrorBudget::from_raw(2.5), ErrorBudget::Limited(3));
        assert!(!ErrorBudget::Limited(3).is_exhausted(2));
        assert!(ErrorBudget::Limited(3).is_exhausted(3));
        assert!(!ErrorBudget::Unlimited.is_exhausted(u32::MAX));
    }

    #[test]
    fn test_from_json_str_reports_syntax_errors() {
        assert!(matches!(GameData::from_json_str("[{"), Err(LoadError::Json(_))));
    }
}
