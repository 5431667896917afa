//! Touch drag orchestrator.
//!
//! A parallel lifecycle to the pointer path: touch devices disambiguate
//! drag-intent from scrolling with a long-press, float the real card over a
//! placeholder instead of cloning, and auto-scroll on both axes. The
//! threshold math, session store, hit-testing and scroll plumbing are the
//! same shared modules the pointer engine uses; only the lifecycle differs.
//!
//! The engine never owns a timer. `poll(now_ms)` fires a pending long-press
//! once its deadline has passed; hosts call it from their frame loop.

use tracing::debug;

use crate::board::BoardMap;
use crate::effects::Effect;
use crate::geometry::{self, Point};
use crate::scroll::{AutoScroller, ScrollLock, Viewport};
use crate::session::{DragSession, PointerStart};
use crate::settings::DragTuning;
use crate::types::TaskStatus;

const DRAG_START_HAPTIC_MS: u64 = 40;
const DROP_HAPTIC_MS: u64 = 25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: u64,
}

impl TouchEvent {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Where the card came from, saved at long-press time so a cancelled drag
/// can put it back in its exact original slot.
#[derive(Debug, Clone, PartialEq)]
struct RestoreSlot {
    home: TaskStatus,
    next_sibling: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct ArmedPress {
    origin: Point,
    deadline_ms: u64,
}

pub struct TouchDragEngine {
    tuning: DragTuning,
    viewport: Viewport,
    board: BoardMap,
    session: DragSession,
    scroll_lock: ScrollLock,
    auto_scroll: AutoScroller,
    armed: Option<ArmedPress>,
    restore: Option<RestoreSlot>,
    active_highlight: Option<String>,
}

impl TouchDragEngine {
    pub fn new(tuning: DragTuning, viewport: Viewport) -> Self {
        Self {
            tuning,
            viewport,
            board: BoardMap::default(),
            session: DragSession::default(),
            scroll_lock: ScrollLock::default(),
            auto_scroll: AutoScroller::default(),
            armed: None,
            restore: None,
            active_highlight: None,
        }
    }

    pub fn board_mut(&mut self) -> &mut BoardMap {
        &mut self.board
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    pub fn long_press_pending(&self) -> bool {
        self.armed.is_some() && !self.session.is_dragging()
    }

    pub fn on_touch_start(&mut self, event: &TouchEvent) -> Vec<Effect> {
        if !self.session.is_idle() {
            return Vec::new();
        }
        let Some(card) = self.board.card_at(event.point()) else {
            return Vec::new();
        };
        let task_id = card.task_id.clone();
        let home = card.home;
        let next_sibling = self
            .board
            .next_sibling(&task_id)
            .map(|sibling| sibling.task_id.clone());

        let start = PointerStart {
            point: event.point(),
            timestamp_ms: event.timestamp_ms,
        };
        if !self.session.begin(task_id, home, 0, start) {
            return Vec::new();
        }
        self.armed = Some(ArmedPress {
            origin: event.point(),
            deadline_ms: event.timestamp_ms + self.tuning.long_press_ms,
        });
        self.restore = Some(RestoreSlot { home, next_sibling });
        Vec::new()
    }

    /// Fire a pending long-press once its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> Vec<Effect> {
        let Some(armed) = self.armed.clone() else {
            return Vec::new();
        };
        if self.session.is_dragging() || now_ms < armed.deadline_ms {
            return Vec::new();
        }
        if !self.session.mark_dragging() {
            return Vec::new();
        }

        let task_id = self.session.task_id().unwrap_or_default().to_string();
        debug!(task_id, "long-press fired, beginning touch drag");

        let mut effects = vec![
            Effect::LeavePlaceholder {
                task_id: task_id.clone(),
            },
            Effect::PinCard {
                task_id,
                x: armed.origin.x,
                y: armed.origin.y,
            },
        ];
        if let Some(lock) = self.scroll_lock.lock() {
            effects.push(lock);
        }
        effects.push(Effect::HapticPulse {
            ms: DRAG_START_HAPTIC_MS,
        });
        effects
    }

    pub fn on_touch_move(&mut self, event: &TouchEvent) -> Vec<Effect> {
        if let Some(armed) = &self.armed
            && !self.session.is_dragging()
        {
            // Finger ran before the long-press fired: this is a scroll,
            // not a drag.
            if geometry::drag_distance(armed.origin, event.point())
                > self.tuning.long_press_cancel_px
            {
                self.abandon();
            }
            return Vec::new();
        }
        if !self.session.is_dragging() {
            return Vec::new();
        }

        let task_id = self.session.task_id().unwrap_or_default().to_string();
        let mut effects = vec![Effect::PinCard {
            task_id,
            x: event.x,
            y: event.y,
        }];
        if let Some(scroll) =
            self.auto_scroll
                .two_axis(&self.tuning, self.viewport, event.point(), event.timestamp_ms)
        {
            effects.push(scroll);
        }
        effects.extend(self.update_highlight(event.point()));
        effects
    }

    pub fn on_touch_end(&mut self, event: &TouchEvent) -> Vec<Effect> {
        if self.session.is_idle() {
            return Vec::new();
        }
        let snapshot = self.session.capture();
        if !snapshot.was_dragging {
            // Long-press never fired; the tap proceeds as a normal tap.
            self.abandon();
            return Vec::new();
        }

        let mut effects = Vec::new();
        let dropped = match (snapshot.task_id.as_deref(), snapshot.source) {
            (Some(task_id), Some(source)) => {
                match self.board.zone_at(event.point()) {
                    Some(zone) if zone.status != source => {
                        let status = zone.status;
                        self.session.note_completed(event.timestamp_ms);
                        effects.push(Effect::MoveCard {
                            task_id: task_id.to_string(),
                            to: status,
                        });
                        effects.push(Effect::PersistStatus {
                            task_id: task_id.to_string(),
                            status,
                        });
                        effects.push(Effect::HapticPulse { ms: DROP_HAPTIC_MS });
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        };

        if !dropped
            && let (Some(task_id), Some(slot)) = (snapshot.task_id.clone(), self.restore.clone())
        {
            effects.push(Effect::RestoreCard {
                task_id,
                to: slot.home,
                before: slot.next_sibling,
            });
        }

        effects.extend(self.cleanup());
        effects
    }

    /// Cancellation always restores; there is no drop branch.
    pub fn on_touch_cancel(&mut self, _event: &TouchEvent) -> Vec<Effect> {
        if self.session.is_idle() {
            return Vec::new();
        }
        let snapshot = self.session.capture();
        if !snapshot.was_dragging {
            self.abandon();
            return Vec::new();
        }

        let mut effects = Vec::new();
        if let (Some(task_id), Some(slot)) = (snapshot.task_id.clone(), self.restore.clone()) {
            effects.push(Effect::RestoreCard {
                task_id,
                to: slot.home,
                before: slot.next_sibling,
            });
        }
        effects.extend(self.cleanup());
        effects
    }

    /// Undo an optimistic drop after the backend refused the status change.
    pub fn revert_drop(&mut self, task_id: &str, original: TaskStatus) -> Vec<Effect> {
        debug!(task_id, status = original.as_str(), "reverting optimistic touch drop");
        vec![Effect::RevertCard {
            task_id: task_id.to_string(),
            to: original,
        }]
    }

    fn update_highlight(&mut self, point: Point) -> Vec<Effect> {
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

    fn abandon(&mut self) {
        self.armed = None;
        self.restore = None;
        self.session.reset();
    }

    fn cleanup(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::RemovePlaceholder];
        if let Some(previous) = self.active_highlight.take() {
            effects.push(Effect::ClearHighlight { zone_id: previous });
        }
        effects.push(Effect::ClearAllHighlights);
        if let Some(unlock) = self.scroll_lock.unlock() {
            effects.push(unlock);
        }
        self.auto_scroll.reset();
        self.armed = None;
        self.restore = None;
        self.session.reset();
        effects
    }
}
