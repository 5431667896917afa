//! Pure gesture math: distances, metrics, and click-versus-drag
//! classification. Nothing here touches state, which keeps the
//! classification independently testable.

use serde::{Deserialize, Serialize};

use crate::settings::DragTuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMetrics {
    pub time_diff_ms: u64,
    pub delta_x: f64,
    pub delta_y: f64,
    pub distance: f64,
}

/// Euclidean distance between the press point and the current point.
pub fn drag_distance(start: Point, current: Point) -> f64 {
    let dx = current.x - start.x;
    let dy = current.y - start.y;
    (dx * dx + dy * dy).sqrt()
}

pub fn drag_metrics(start: Point, start_ms: u64, current: Point, now_ms: u64) -> DragMetrics {
    DragMetrics {
        time_diff_ms: now_ms.saturating_sub(start_ms),
        delta_x: current.x - start.x,
        delta_y: current.y - start.y,
        distance: drag_distance(start, current),
    }
}

/// Whether accumulated travel is enough to promote a press into a drag.
/// Touch-capable devices get a wider threshold to debounce finger wobble.
pub fn should_start_drag(tuning: &DragTuning, distance: f64, touch_capable: bool) -> bool {
    distance > tuning.start_threshold_px(touch_capable)
}

/// A press/release pair short and still enough to be a genuine click
/// rather than an aborted drag.
pub fn is_quick_click(tuning: &DragTuning, metrics: &DragMetrics) -> bool {
    metrics.time_diff_ms < tuning.quick_click_max_ms
        && metrics.distance < tuning.quick_click_max_px
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> DragTuning {
        DragTuning::default()
    }

    #[test]
    fn distance_is_euclidean() {
        let start = Point::new(0.0, 0.0);
        assert_eq!(drag_distance(start, Point::new(3.0, 4.0)), 5.0);
        assert_eq!(drag_distance(start, start), 0.0);
    }

    #[test]
    fn metrics_capture_deltas_and_elapsed_time() {
        let metrics = drag_metrics(Point::new(10.0, 10.0), 1_000, Point::new(13.0, 6.0), 1_150);
        assert_eq!(metrics.time_diff_ms, 150);
        assert_eq!(metrics.delta_x, 3.0);
        assert_eq!(metrics.delta_y, -4.0);
        assert_eq!(metrics.distance, 5.0);
    }

    #[test]
    fn metrics_saturate_on_clock_skew() {
        let metrics = drag_metrics(Point::default(), 2_000, Point::default(), 1_000);
        assert_eq!(metrics.time_diff_ms, 0);
    }

    #[test]
    fn drag_start_uses_device_dependent_threshold() {
        let tuning = tuning();
        assert!(!should_start_drag(&tuning, 5.0, false));
        assert!(should_start_drag(&tuning, 5.1, false));
        assert!(!should_start_drag(&tuning, 8.0, true));
        assert!(should_start_drag(&tuning, 8.1, true));
    }

    #[test]
    fn quick_click_requires_short_time_and_short_travel() {
        let tuning = tuning();
        let quick = DragMetrics {
            time_diff_ms: 120,
            delta_x: 1.0,
            delta_y: 1.0,
            distance: 1.4,
        };
        assert!(is_quick_click(&tuning, &quick));

        let slow = DragMetrics {
            time_diff_ms: 200,
            ..quick
        };
        assert!(!is_quick_click(&tuning, &slow));

        let far = DragMetrics {
            distance: 5.0,
            ..quick
        };
        assert!(!is_quick_click(&tuning, &far));
    }
}
