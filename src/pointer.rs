//! Pointer drag orchestrator.
//!
//! State machine: Idle → Pending → Dragging → (Dropped | Cancelled) → Idle.
//! A press on a card only records state; the drag becomes visible once the
//! pointer travels past the start threshold. Release either drops into a
//! different column, replays a quick click, or cancels. Cleanup runs on
//! every release path and is idempotent.

use tracing::debug;

use crate::board::BoardMap;
use crate::effects::Effect;
use crate::geometry::{self, Point};
use crate::scroll::{AutoScroller, ScrollLock, Viewport};
use crate::session::{DragSession, DragSnapshot, PointerStart};
use crate::settings::DragTuning;
use crate::types::TaskStatus;

/// One event from the host's pointer stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: i64,
    /// Only the primary pointer drives a drag; secondary touches are
    /// ignored wholesale.
    pub primary: bool,
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DragPhase {
    Idle,
    Pending,
    Dragging,
}

pub struct PointerDragEngine {
    tuning: DragTuning,
    touch_capable: bool,
    viewport: Viewport,
    board: BoardMap,
    session: DragSession,
    scroll_lock: ScrollLock,
    auto_scroll: AutoScroller,
    active_highlight: Option<String>,
}

impl PointerDragEngine {
    pub fn new(tuning: DragTuning, viewport: Viewport, touch_capable: bool) -> Self {
        Self {
            tuning,
            touch_capable,
            viewport,
            board: BoardMap::default(),
            session: DragSession::default(),
            scroll_lock: ScrollLock::default(),
            auto_scroll: AutoScroller::default(),
            active_highlight: None,
        }
    }

    /// The host re-registers layout after every render.
    pub fn board_mut(&mut self) -> &mut BoardMap {
        &mut self.board
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn phase(&self) -> DragPhase {
        if self.session.is_dragging() {
            DragPhase::Dragging
        } else if self.session.has_valid_state() {
            DragPhase::Pending
        } else {
            DragPhase::Idle
        }
    }

    /// True while the just-dropped window is open; hosts consult this to
    /// swallow the synthetic click a browser fires right after release.
    pub fn click_guard_active(&self, now_ms: u64) -> bool {
        self.session
            .click_guard_active(now_ms, self.tuning.drop_click_guard_ms)
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Vec<Effect> {
        if !event.primary {
            return Vec::new();
        }
        let Some(card) = self.board.card_at(event.point()) else {
            return Vec::new();
        };
        let start = PointerStart {
            point: event.point(),
            timestamp_ms: event.timestamp_ms,
        };
        self.session
            .begin(card.task_id.clone(), card.home, event.pointer_id, start);
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> Vec<Effect> {
        if !event.primary
            || !self.session.has_valid_state()
            || !self.session.owns_pointer(event.pointer_id)
        {
            return Vec::new();
        }
        if !self
            .session
            .admit_move(event.timestamp_ms, self.tuning.move_throttle_ms)
        {
            return Vec::new();
        }
        let Some(start) = self.session.start() else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        if !self.session.is_dragging() {
            let distance = geometry::drag_distance(start.point, event.point());
            if !geometry::should_start_drag(&self.tuning, distance, self.touch_capable) {
                return effects;
            }
            effects.extend(self.begin_drag(event));
        }

        effects.push(Effect::MoveClone {
            x: event.x,
            y: event.y,
        });
        if let Some(scroll) =
            self.auto_scroll
                .vertical(&self.tuning, self.viewport, event.point(), event.timestamp_ms)
        {
            effects.push(scroll);
        }
        self.session.schedule_frame(event.point());
        effects
    }

    /// Drop-zone resolution runs on the animation frame, not on every move,
    /// so at most one hit-test happens per frame no matter how fast the
    /// pointer stream is. Frames closer together than the minimum interval
    /// keep their pending point for the next one.
    pub fn on_frame(&mut self, now_ms: u64) -> Vec<Effect> {
        if !self.session.is_dragging() {
            self.session.take_frame();
            return Vec::new();
        }
        if !self.session.has_pending_frame() {
            return Vec::new();
        }
        if !self
            .session
            .admit_frame(now_ms, self.tuning.frame_min_interval_ms)
        {
            return Vec::new();
        }
        let Some(point) = self.session.take_frame() else {
            return Vec::new();
        };

        let next = self
            .board
            .zone_at(point)
            .filter(|zone| Some(zone.status) != self.session.source())
            .map(|zone| zone.id.clone());

        let mut effects = Vec::new();
        if next != self.active_highlight {
            if let Some(previous) = self.active_highlight.take() {
                effects.push(Effect::ClearHighlight { zone_id: previous });
            }
            if let Some(zone_id) = next.clone() {
                effects.push(Effect::HighlightZone { zone_id });
            }
            self.active_highlight = next;
        }
        effects
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> Vec<Effect> {
        if self.session.is_idle() {
            return Vec::new();
        }
        if !self.session.owns_pointer(event.pointer_id) {
            return Vec::new();
        }

        let snapshot = self.session.capture();
        let mut effects = Vec::new();

        if snapshot.was_dragging {
            effects.extend(self.resolve_drop(&snapshot, event));
        } else if let Some(start) = self.session.start() {
            let metrics = geometry::drag_metrics(
                start.point,
                start.timestamp_ms,
                event.point(),
                event.timestamp_ms,
            );
            if geometry::is_quick_click(&self.tuning, &metrics)
                && !self.click_guard_active(event.timestamp_ms)
            {
                effects.push(Effect::DispatchClick {
                    x: event.x,
                    y: event.y,
                });
            }
        }

        effects.extend(self.cleanup(&snapshot));
        effects
    }

    /// Cancellation never drops and never replays a click.
    pub fn on_pointer_cancel(&mut self, event: &PointerEvent) -> Vec<Effect> {
        if self.session.is_idle() {
            return Vec::new();
        }
        if !self.session.owns_pointer(event.pointer_id) {
            return Vec::new();
        }
        let snapshot = self.session.capture();
        self.cleanup(&snapshot)
    }

    /// Undo an optimistic drop after the backend refused the status change.
    pub fn revert_drop(&mut self, task_id: &str, original: TaskStatus) -> Vec<Effect> {
        debug!(task_id, status = original.as_str(), "reverting optimistic drop");
        vec![Effect::RevertCard {
            task_id: task_id.to_string(),
            to: original,
        }]
    }

    fn begin_drag(&mut self, event: &PointerEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.session.mark_dragging() {
            return effects;
        }
        effects.push(Effect::CapturePointer {
            pointer_id: event.pointer_id,
        });
        if let Some(lock) = self.scroll_lock.lock() {
            effects.push(lock);
        }

        let task_id = self.session.task_id().unwrap_or_default().to_string();
        let bounds = self
            .board
            .card(&task_id)
            .map(|card| card.bounds)
            .unwrap_or_default();
        effects.push(Effect::SpawnClone {
            task_id: task_id.clone(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        });
        effects.push(Effect::HideOriginal { task_id });
        if let Some(source) = self.session.source() {
            effects.push(Effect::ActivateDropZones { except: source });
        }
        effects
    }

    fn resolve_drop(&mut self, snapshot: &DragSnapshot, event: &PointerEvent) -> Vec<Effect> {
        let (Some(task_id), Some(source)) = (snapshot.task_id.as_deref(), snapshot.source) else {
            return Vec::new();
        };
        let Some(zone) = self.board.zone_at(event.point()) else {
            // No zone under the release point: treated as a cancel.
            return Vec::new();
        };
        if zone.status == source {
            return Vec::new();
        }

        let status = zone.status;
        self.session.note_completed(event.timestamp_ms);
        vec![
            Effect::MoveCard {
                task_id: task_id.to_string(),
                to: status,
            },
            Effect::PlayDropAnimation {
                task_id: task_id.to_string(),
            },
            Effect::PersistStatus {
                task_id: task_id.to_string(),
                status,
            },
        ]
    }

    fn cleanup(&mut self, snapshot: &DragSnapshot) -> Vec<Effect> {
        let mut effects = Vec::new();
        if snapshot.was_dragging {
            effects.push(Effect::RemoveClone);
            if let Some(task_id) = snapshot.task_id.clone() {
                effects.push(Effect::RestoreOriginal { task_id });
            }
            if let Some(previous) = self.active_highlight.take() {
                effects.push(Effect::ClearHighlight { zone_id: previous });
            }
            effects.push(Effect::ClearAllHighlights);
            effects.push(Effect::DeactivateDropZones);
        }
        if let Some(unlock) = self.scroll_lock.unlock() {
            effects.push(unlock);
        }
        self.auto_scroll.reset();
        self.session.reset();
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Rect, standard_columns};

    fn engine() -> PointerDragEngine {
        let mut engine =
            PointerDragEngine::new(DragTuning::default(), Viewport::new(1024.0, 768.0), false);
        for (index, (id, status)) in standard_columns().into_iter().enumerate() {
            let x = index as f64 * 200.0;
            engine
                .board_mut()
                .register_zone(id, status, Rect::new(x, 0.0, 200.0, 700.0));
        }
        engine.board_mut().register_card(
            "t1",
            crate::types::TaskStatus::ToDo,
            Rect::new(20.0, 20.0, 160.0, 60.0),
        );
        engine
    }

    fn down(x: f64, y: f64, ms: u64) -> PointerEvent {
        PointerEvent {
            pointer_id: 1,
            primary: true,
            x,
            y,
            timestamp_ms: ms,
        }
    }

    #[test]
    fn press_on_empty_board_space_stays_idle() {
        let mut engine = engine();
        engine.on_pointer_down(&down(190.0, 600.0, 0));
        assert_eq!(engine.phase(), DragPhase::Idle);
    }

    #[test]
    fn press_on_card_enters_pending_without_effects() {
        let mut engine = engine();
        let effects = engine.on_pointer_down(&down(50.0, 50.0, 0));
        assert!(effects.is_empty());
        assert_eq!(engine.phase(), DragPhase::Pending);
    }

    #[test]
    fn secondary_pointer_press_is_ignored() {
        let mut engine = engine();
        let event = PointerEvent {
            primary: false,
            ..down(50.0, 50.0, 0)
        };
        engine.on_pointer_down(&event);
        assert_eq!(engine.phase(), DragPhase::Idle);
    }

    #[test]
    fn crossing_threshold_starts_drag_with_transition_effects() {
        let mut engine = engine();
        engine.on_pointer_down(&down(50.0, 50.0, 0));
        let effects = engine.on_pointer_move(&down(60.0, 60.0, 32));
        assert_eq!(engine.phase(), DragPhase::Dragging);
        assert!(effects.iter().any(|e| matches!(e, Effect::CapturePointer { pointer_id: 1 })));
        assert!(effects.contains(&Effect::LockScroll));
        assert!(effects.iter().any(|e| matches!(e, Effect::SpawnClone { task_id, .. } if task_id == "t1")));
        assert!(
            effects.contains(&Effect::ActivateDropZones {
                except: crate::types::TaskStatus::ToDo
            })
        );
    }

    #[test]
    fn moves_inside_threshold_stay_pending() {
        let mut engine = engine();
        engine.on_pointer_down(&down(50.0, 50.0, 0));
        let effects = engine.on_pointer_move(&down(53.0, 53.0, 32));
        assert!(effects.is_empty());
        assert_eq!(engine.phase(), DragPhase::Pending);
    }

    #[test]
    fn moves_are_throttled() {
        let mut engine = engine();
        engine.on_pointer_down(&down(50.0, 50.0, 0));
        engine.on_pointer_move(&down(80.0, 80.0, 32));
        // 8ms after the previous processed move: dropped.
        let effects = engine.on_pointer_move(&down(90.0, 90.0, 40));
        assert!(effects.is_empty());
    }

    #[test]
    fn frame_highlights_zone_under_pointer_once() {
        let mut engine = engine();
        engine.on_pointer_down(&down(50.0, 50.0, 0));
        engine.on_pointer_move(&down(250.0, 100.0, 32));

        let effects = engine.on_frame(33);
        assert_eq!(
            effects,
            vec![Effect::HighlightZone {
                zone_id: "inProgressColumn".to_string()
            }]
        );
        // No pending frame, no churn.
        assert!(engine.on_frame(50).is_empty());
    }

    #[test]
    fn frame_swaps_highlight_when_crossing_columns() {
        let mut engine = engine();
        engine.on_pointer_down(&down(50.0, 50.0, 0));
        engine.on_pointer_move(&down(250.0, 100.0, 32));
        engine.on_frame(33);
        engine.on_pointer_move(&down(450.0, 100.0, 64));
        let effects = engine.on_frame(65);
        assert_eq!(
            effects,
            vec![
                Effect::ClearHighlight {
                    zone_id: "inProgressColumn".to_string()
                },
                Effect::HighlightZone {
                    zone_id: "awaitingFeedbackColumn".to_string()
                },
            ]
        );
    }

    #[test]
    fn frames_are_paced_to_minimum_interval() {
        let mut engine = engine();
        engine.on_pointer_down(&down(50.0, 50.0, 0));
        engine.on_pointer_move(&down(250.0, 100.0, 32));
        assert!(!engine.on_frame(33).is_empty());

        engine.on_pointer_move(&down(450.0, 100.0, 48));
        // 15ms after the last processed frame: the pending point is held.
        assert!(engine.on_frame(48).is_empty());
        let effects = engine.on_frame(49);
        assert_eq!(
            effects,
            vec![
                Effect::ClearHighlight {
                    zone_id: "inProgressColumn".to_string()
                },
                Effect::HighlightZone {
                    zone_id: "awaitingFeedbackColumn".to_string()
                },
            ]
        );
    }

    #[test]
    fn source_column_is_never_highlighted() {
        let mut engine = engine();
        engine.on_pointer_down(&down(50.0, 50.0, 0));
        engine.on_pointer_move(&down(80.0, 120.0, 32));
        assert!(engine.on_frame(33).is_empty());
    }

    #[test]
    fn cancel_cleans_up_without_status_update() {
        let mut engine = engine();
        engine.on_pointer_down(&down(50.0, 50.0, 0));
        engine.on_pointer_move(&down(250.0, 100.0, 32));
        let effects = engine.on_pointer_cancel(&down(250.0, 100.0, 64));
        assert!(effects.contains(&Effect::RemoveClone));
        assert!(effects.contains(&Effect::UnlockScroll));
        assert!(!effects.iter().any(Effect::is_persist));
        assert_eq!(engine.phase(), DragPhase::Idle);
    }

    #[test]
    fn revert_drop_emits_revert_card() {
        let mut engine = engine();
        let effects = engine.revert_drop("t1", crate::types::TaskStatus::ToDo);
        assert_eq!(
            effects,
            vec![Effect::RevertCard {
                task_id: "t1".to_string(),
                to: crate::types::TaskStatus::ToDo
            }]
        );
    }
}
