//! Mutable state of an in-progress drag.
//!
//! One `DragSession` is owned by each engine instance; only one drag may be
//! active per session at a time. Every field goes back to its idle value on
//! `reset`, and `reset` is safe to call any number of times.

use tracing::debug;

use crate::geometry::Point;
use crate::types::TaskStatus;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerStart {
    pub point: Point,
    pub timestamp_ms: u64,
}

/// Snapshot taken at the start of release handling, before any reset, so
/// the drop branch never races the cleanup branch for the same fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    pub was_dragging: bool,
    pub task_id: Option<String>,
    pub source: Option<TaskStatus>,
}

#[derive(Debug, Default, Clone)]
pub struct DragSession {
    task_id: Option<String>,
    source: Option<TaskStatus>,
    pointer_id: Option<i64>,
    start: Option<PointerStart>,
    is_dragging: bool,
    last_move_ms: u64,
    last_frame_ms: u64,
    pending_frame: Option<Point>,
    completed_at_ms: Option<u64>,
}

impl DragSession {
    /// Record the press that may become a drag. Ignored while another
    /// gesture is in flight.
    pub fn begin(
        &mut self,
        task_id: impl Into<String>,
        source: TaskStatus,
        pointer_id: i64,
        start: PointerStart,
    ) -> bool {
        if self.task_id.is_some() {
            debug!("ignoring pointer-down while a drag session is active");
            return false;
        }
        self.task_id = Some(task_id.into());
        self.source = Some(source);
        self.pointer_id = Some(pointer_id);
        self.start = Some(start);
        self.is_dragging = false;
        self.last_move_ms = start.timestamp_ms;
        self.pending_frame = None;
        true
    }

    /// Promote the pending press to a live drag. Refused when the session
    /// lacks a task or start point, preserving the invariant that
    /// `is_dragging` implies both are present.
    pub fn mark_dragging(&mut self) -> bool {
        if self.task_id.is_none() || self.start.is_none() {
            debug!("refusing to mark a drag without task and start point");
            return false;
        }
        self.is_dragging = true;
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_idle(&self) -> bool {
        self.task_id.is_none() && !self.is_dragging
    }

    /// Move events are only worth processing while task, start point and
    /// pointer are all known.
    pub fn has_valid_state(&self) -> bool {
        self.task_id.is_some() && self.start.is_some() && self.pointer_id.is_some()
    }

    pub fn owns_pointer(&self, pointer_id: i64) -> bool {
        self.pointer_id == Some(pointer_id)
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn source(&self) -> Option<TaskStatus> {
        self.source
    }

    pub fn start(&self) -> Option<PointerStart> {
        self.start
    }

    /// Throttle gate: true when enough time has passed since the last
    /// processed move. Records `now_ms` when it admits the event.
    pub fn admit_move(&mut self, now_ms: u64, throttle_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_move_ms) < throttle_ms {
            return false;
        }
        self.last_move_ms = now_ms;
        true
    }

    /// Frame counterpart of `admit_move`: true when enough time has passed
    /// since the last processed frame. Records `now_ms` when it admits.
    pub fn admit_frame(&mut self, now_ms: u64, interval_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_frame_ms) < interval_ms {
            return false;
        }
        self.last_frame_ms = now_ms;
        true
    }

    /// At most one frame is pending at a time; a newer move replaces the
    /// coordinates the next frame will see.
    pub fn schedule_frame(&mut self, point: Point) {
        self.pending_frame = Some(point);
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn take_frame(&mut self) -> Option<Point> {
        self.pending_frame.take()
    }

    pub fn capture(&self) -> DragSnapshot {
        DragSnapshot {
            was_dragging: self.is_dragging,
            task_id: self.task_id.clone(),
            source: self.source,
        }
    }

    /// Full reset to idle. Idempotent; the completion timestamp survives so
    /// the post-drop click guard keeps working after cleanup.
    pub fn reset(&mut self) {
        self.task_id = None;
        self.source = None;
        self.pointer_id = None;
        self.start = None;
        self.is_dragging = false;
        self.pending_frame = None;
        self.last_move_ms = 0;
        self.last_frame_ms = 0;
    }

    pub fn note_completed(&mut self, now_ms: u64) {
        self.completed_at_ms = Some(now_ms);
    }

    /// True while the just-dropped window is open, so the synthetic click
    /// fired right after a drop does not also open the task detail.
    pub fn click_guard_active(&self, now_ms: u64, guard_ms: u64) -> bool {
        match self.completed_at_ms {
            Some(completed) => now_ms.saturating_sub(completed) < guard_ms,
            None => false,
        }
    }
}
