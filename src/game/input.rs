//! Translation of raw pointer events into engine inputs.
//!
//! Two interaction styles exist: click-to-select and drag-and-drop. Both end
//! up as the same two inputs, so the engine never knows which one is active.

use serde::{Deserialize, Serialize};

use super::data::CardId;

/// Which column an event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Click { column: Column, id: CardId },
    DragStart(CardId),
    /// Drag finished without landing on a definition.
    DragEnd,
    Drop(CardId),
}

/// What the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineInput {
    SelectConcept(CardId),
    TargetDefinition(CardId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    #[default]
    Click,
    Drag,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputAdapter {
    Click,
    Drag { dragging: Option<CardId> },
}

impl InputAdapter {
    pub fn new(mode: InputMode) -> Self {
        match mode {
            InputMode::Click => InputAdapter::Click,
            InputMode::Drag => InputAdapter::Drag { dragging: None },
        }
    }

    pub fn mode(&self) -> InputMode {
        match self {
            InputAdapter::Click => InputMode::Click,
            InputAdapter::Drag { .. } => InputMode::Drag,
        }
    }

    /// `selected` is the engine's current selection; a drag that starts on
    /// the already selected concept must not toggle it off.
    pub fn translate(&mut self, event: PointerEvent, selected: Option<CardId>) -> Option<EngineInput> {
        match self {
            InputAdapter::Click => match event {
                PointerEvent::Click {
                    column: Column::Left,
                    id,
                } => Some(EngineInput::SelectConcept(id)),
                PointerEvent::Click {
                    column: Column::Right,
                    id,
                } => Some(EngineInput::TargetDefinition(id)),
                _ => None,
            },
            InputAdapter::Drag { dragging } => match event {
                PointerEvent::DragStart(id) => {
                    *dragging = Some(id);
                    if selected == Some(id) {
                        None
                    } else {
                        Some(EngineInput::SelectConcept(id))
                    }
                }
                PointerEvent::DragEnd => {
                    *dragging = None;
                    None
                }
                // A drop with no drag in flight has nothing to resolve.
                PointerEvent::Drop(id) => dragging
                    .take()
                    .map(|_| EngineInput::TargetDefinition(id)),
                PointerEvent::Click { .. } => None,
            },
        }
    }

    /// Forget any drag in flight (new game, lost focus).
    pub fn reset(&mut self) {
        if let InputAdapter::Drag { dragging } = self {
            *dragging = None;
        }
    }
}
