//! Scroll suspension and edge-triggered auto-scroll.
//!
//! While a drag is live the page must not scroll on its own, but the drag
//! itself scrolls the board when the pointer nears a viewport edge, with a
//! speed that grows as the pointer gets closer to the edge.

use crate::effects::Effect;
use crate::geometry::Point;
use crate::settings::DragTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Idempotent scroll suspension. Locking twice emits one `LockScroll`;
/// unlocking without a lock is a no-op, not an error.
#[derive(Debug, Default, Clone)]
pub struct ScrollLock {
    locked: bool,
}

impl ScrollLock {
    pub fn lock(&mut self) -> Option<Effect> {
        if self.locked {
            return None;
        }
        self.locked = true;
        Some(Effect::LockScroll)
    }

    pub fn unlock(&mut self) -> Option<Effect> {
        if !self.locked {
            return None;
        }
        self.locked = false;
        Some(Effect::UnlockScroll)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Speed toward an edge, scaled by how deep into the edge band the
/// coordinate sits. Zero outside the band. The bands are capped at half
/// the extent so they never overlap on short viewports.
fn edge_speed(coord: f64, extent: f64, threshold: f64, max_speed: f64) -> f64 {
    let threshold = threshold.min(extent / 2.0);
    if coord < threshold {
        let depth = (threshold - coord.max(0.0)) / threshold;
        -max_speed * depth.min(1.0)
    } else if coord > extent - threshold {
        let depth = (coord.min(extent) - (extent - threshold)) / threshold;
        max_speed * depth.min(1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Default, Clone)]
pub struct AutoScroller {
    last_tick_ms: Option<u64>,
}

impl AutoScroller {
    /// Vertical-only auto-scroll for the pointer path.
    pub fn vertical(
        &mut self,
        tuning: &DragTuning,
        viewport: Viewport,
        point: Point,
        now_ms: u64,
    ) -> Option<Effect> {
        if !self.admit(now_ms, tuning.pointer_scroll_interval_ms) {
            return None;
        }
        let threshold = tuning.edge_threshold_px(viewport.width);
        let dy = edge_speed(point.y, viewport.height, threshold, tuning.max_scroll_speed_px);
        if dy == 0.0 {
            return None;
        }
        Some(Effect::ScrollBy { dx: 0.0, dy })
    }

    /// Two-axis auto-scroll for the touch path.
    pub fn two_axis(
        &mut self,
        tuning: &DragTuning,
        viewport: Viewport,
        point: Point,
        now_ms: u64,
    ) -> Option<Effect> {
        if !self.admit(now_ms, tuning.touch_scroll_interval_ms) {
            return None;
        }
        let threshold = tuning.edge_threshold_px(viewport.width);
        let dx = edge_speed(point.x, viewport.width, threshold, tuning.max_scroll_speed_px);
        let dy = edge_speed(point.y, viewport.height, threshold, tuning.max_scroll_speed_px);
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(Effect::ScrollBy { dx, dy })
    }

    pub fn reset(&mut self) {
        self.last_tick_ms = None;
    }

    fn admit(&mut self, now_ms: u64, interval_ms: u64) -> bool {
        if let Some(last) = self.last_tick_ms
            && now_ms.saturating_sub(last) < interval_ms
        {
            return false;
        }
        self.last_tick_ms = Some(now_ms);
        true
    }
}
