//! Words on the wheel and how they are read from loose JSON.

use serde::Serialize;
use serde_json::Value;

use crate::error::WheelError;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeightedItem {
    pub text: String,
    pub weight: f64, // > 0, finite
}

impl WeightedItem {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight: positive(weight).unwrap_or(1.0),
        }
    }
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

fn weight_of(entry: &serde_json::Map<String, Value>) -> f64 {
    // `importance` wins over `weight` when both are valid.
    ["importance", "weight"]
        .iter()
        .filter_map(|key| entry.get(*key).and_then(Value::as_f64).and_then(positive))
        .next()
        .unwrap_or(1.0)
}

fn text_of(entry: &Value) -> Option<String> {
    let raw = match entry {
        Value::String(s) => s.clone(),
        Value::Object(obj) => match obj.get("text")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        },
        _ => return None,
    };
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Accepts plain strings and `{text, importance|weight}` objects. Blank or
/// malformed entries are dropped; an empty result is an error.
pub fn parse_items(value: &Value) -> Result<Vec<WeightedItem>, WheelError> {
    let entries = value.as_array().ok_or(WheelError::NotAnArray)?;
    let items: Vec<WeightedItem> = entries
        .iter()
        .filter_map(|entry| {
            let text = text_of(entry)?;
            let weight = entry.as_object().map_or(1.0, weight_of);
            Some(WeightedItem { text, weight })
        })
        .collect();

    if items.is_empty() {
        return Err(WheelError::NoValidItems);
    }
    Ok(items)
}

pub fn parse_items_str(text: &str) -> Result<Vec<WeightedItem>, WheelError> {
    let value: Value = serde_json::from_str(text)?;
    parse_items(&value)
}
