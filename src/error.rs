//! Error types shared by the matching game and the fortune wheel.
//!
//! Every variant renders as a message that can be shown to the player as-is;
//! the wasm bridge forwards `to_string()` to JS untouched.

use thiserror::Error;

use crate::game::CardId;

/// Rejections produced while validating a loaded game file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("game data must be an array of cards or an object with `meta` and `cards`")]
    NotAnObjectOrArray,

    #[error("game data is missing the `cards` array")]
    MissingCards,

    #[error("`cards` must be an array")]
    CardsNotArray,

    #[error("the card list is empty")]
    EmptyDeck,

    #[error("the card list must have an even number of cards (got {0})")]
    OddDeck(usize),

    #[error("card #{index} is not an object")]
    CardNotObject { index: usize },

    #[error("card #{index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("card #{index}: field `{field}` must be {expected}")]
    InvalidField {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },

    #[error("card id {0} is used more than once")]
    DuplicateId(CardId),

    #[error("card {id} points to matchId {match_id}, which does not exist")]
    UnknownMatch { id: CardId, match_id: CardId },

    #[error("card {0} cannot be its own match")]
    SelfMatch(CardId),

    #[error("card {id} matches {match_id}, but card {match_id} does not match it back")]
    AsymmetricMatch { id: CardId, match_id: CardId },

    #[error("`meta` must be an object")]
    InvalidMeta,

    #[error("`meta.{field}` must be a string")]
    InvalidText { field: &'static str },

    #[error("`meta.columnNames` must be an array of exactly two strings")]
    InvalidColumnNames,

    #[error("`meta.{field}` must be a non-negative number")]
    InvalidNumber { field: &'static str },
}

/// Failures of the fortune wheel.
#[derive(Debug, Error)]
pub enum WheelError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("wheel data must be an array of words or {{text, weight}} objects")]
    NotAnArray,

    #[error("the file does not contain any valid words or phrases")]
    NoValidItems,

    #[error("the wheel is already spinning")]
    AlreadySpinning,

    #[error("the wheel has no words loaded")]
    Empty,
}

/// Failures of the matching session outside of data validation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no game is loaded; load a JSON card file first")]
    NothingLoaded,

    #[error(transparent)]
    Load(#[from] LoadError),
}
