//! The engine's output vocabulary.
//!
//! Handlers never mutate a document directly; they return a sequence of
//! effects the rendering host replays against its surface. Tests assert on
//! the effect stream instead of inspecting DOM state.

use crate::types::TaskStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the host to capture the pointer for the duration of the drag.
    /// Best effort: capture failure degrades the drag, it does not end it.
    CapturePointer { pointer_id: i64 },

    /// Create the visual duplicate that follows the pointer, initially
    /// covering the original card's bounding box.
    SpawnClone { task_id: String, x: f64, y: f64, width: f64, height: f64 },
    /// Re-centre the clone on the pointer.
    MoveClone { x: f64, y: f64 },
    RemoveClone,

    HideOriginal { task_id: String },
    RestoreOriginal { task_id: String },

    /// Visually arm every column except the one the card came from.
    ActivateDropZones { except: TaskStatus },
    DeactivateDropZones,
    HighlightZone { zone_id: String },
    ClearHighlight { zone_id: String },
    ClearAllHighlights,

    /// Reparent the card into the target column's content container.
    MoveCard { task_id: String, to: TaskStatus },
    /// Undo an optimistic move after the backend refused it.
    RevertCard { task_id: String, to: TaskStatus },
    PlayDropAnimation { task_id: String },

    /// Replay a suppressed click at the release coordinates so normal
    /// click handlers still fire for quick clicks.
    DispatchClick { x: f64, y: f64 },

    /// Persist the new column assignment for the task.
    PersistStatus { task_id: String, status: TaskStatus },

    LockScroll,
    UnlockScroll,
    ScrollBy { dx: f64, dy: f64 },

    /// Touch path: keep a placeholder in the card's original slot while
    /// the real element floats under the finger.
    LeavePlaceholder { task_id: String },
    RemovePlaceholder,
    /// Switch the real card to fixed positioning tracking the touch point.
    PinCard { task_id: String, x: f64, y: f64 },
    /// Put the card back in its original slot, before `before` if that
    /// sibling still exists, appended otherwise.
    RestoreCard { task_id: String, to: TaskStatus, before: Option<String> },

    HapticPulse { ms: u64 },
}

impl Effect {
    pub fn is_persist(&self) -> bool {
        matches!(self, Effect::PersistStatus { .. })
    }
}

/// Test/host helper: the persistence requests contained in an effect batch.
pub fn persist_requests(effects: &[Effect]) -> Vec<(String, TaskStatus)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::PersistStatus { task_id, status } => Some((task_id.clone(), *status)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_requests_extracts_only_status_updates() {
        let effects = vec![
            Effect::RemoveClone,
            Effect::PersistStatus {
                task_id: "t1".to_string(),
                status: TaskStatus::Done,
            },
            Effect::UnlockScroll,
        ];
        assert_eq!(
            persist_requests(&effects),
            vec![("t1".to_string(), TaskStatus::Done)]
        );
        assert!(effects[1].is_persist());
        assert!(!effects[0].is_persist());
    }
}
