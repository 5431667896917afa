use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::warn;

const MIN_THRESHOLD_PX: f64 = 1.0;
const MAX_THRESHOLD_PX: f64 = 64.0;
const MIN_INTERVAL_MS: u64 = 1;
const MAX_INTERVAL_MS: u64 = 1_000;
const MIN_LONG_PRESS_MS: u64 = 100;
const MAX_LONG_PRESS_MS: u64 = 2_000;
const MIN_EDGE_PX: f64 = 16.0;
const MAX_EDGE_PX: f64 = 400.0;
const MIN_SCROLL_SPEED_PX: f64 = 1.0;
const MAX_SCROLL_SPEED_PX: f64 = 120.0;

/// Gesture-classification and auto-scroll tuning.
///
/// The defaults are the empirically tuned values the board ships with; every
/// one of them can be overridden from `settings.toml` so hosts can adjust
/// feel per device class without a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragTuning {
    /// Minimum pointer travel before a press becomes a drag.
    pub drag_threshold_px: f64,
    /// Same threshold on touch-capable devices, where fingers wobble more.
    pub touch_drag_threshold_px: f64,
    pub quick_click_max_ms: u64,
    pub quick_click_max_px: f64,
    /// Pointer-move events closer together than this are dropped.
    pub move_throttle_ms: u64,
    /// Minimum spacing between processed animation frames; frames arriving
    /// sooner keep their pending point for the next one.
    pub frame_min_interval_ms: u64,
    pub long_press_ms: u64,
    /// Finger travel that abandons a pending long-press as a scroll.
    pub long_press_cancel_px: f64,
    pub edge_threshold_narrow_px: f64,
    pub edge_threshold_wide_px: f64,
    /// Viewport width below which the narrow edge threshold applies.
    pub narrow_viewport_px: f64,
    pub pointer_scroll_interval_ms: u64,
    pub touch_scroll_interval_ms: u64,
    pub max_scroll_speed_px: f64,
    /// Window after a drop during which synthetic clicks are swallowed.
    pub drop_click_guard_ms: u64,
}

impl Default for DragTuning {
    fn default() -> Self {
        Self {
            drag_threshold_px: 5.0,
            touch_drag_threshold_px: 8.0,
            quick_click_max_ms: 200,
            quick_click_max_px: 5.0,
            move_throttle_ms: 16,
            frame_min_interval_ms: 16,
            long_press_ms: 350,
            long_press_cancel_px: 10.0,
            edge_threshold_narrow_px: 50.0,
            edge_threshold_wide_px: 120.0,
            narrow_viewport_px: 768.0,
            pointer_scroll_interval_ms: 10,
            touch_scroll_interval_ms: 6,
            max_scroll_speed_px: 24.0,
            drop_click_guard_ms: 100,
        }
    }
}

impl DragTuning {
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("join-kanban");
        path.push("settings.toml");
        Some(path)
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        Self::load_from_path(&path)
    }

    fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(mut tuning) => {
                    tuning.validate();
                    tuning
                }
                Err(error) => {
                    warn!(
                        "failed to parse drag tuning config '{}': {}",
                        path.display(),
                        error
                    );
                    Self::default()
                }
            },
            Err(error) => {
                warn!(
                    "failed to read drag tuning config '{}': {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path().ok_or_else(|| anyhow!("unable to determine config path"))?;
        self.save_to_path(&path)
    }

    fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("invalid tuning config path"))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory '{}'", parent.display()))?;

        let mut validated = self.clone();
        validated.validate();
        let contents =
            toml::to_string_pretty(&validated).context("failed to serialize tuning to TOML")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write tuning config '{}'", path.display()))?;
        Ok(())
    }

    pub fn validate(&mut self) {
        self.drag_threshold_px = self.drag_threshold_px.clamp(MIN_THRESHOLD_PX, MAX_THRESHOLD_PX);
        self.touch_drag_threshold_px = self
            .touch_drag_threshold_px
            .clamp(MIN_THRESHOLD_PX, MAX_THRESHOLD_PX);
        self.quick_click_max_px = self
            .quick_click_max_px
            .clamp(MIN_THRESHOLD_PX, MAX_THRESHOLD_PX);
        self.long_press_cancel_px = self
            .long_press_cancel_px
            .clamp(MIN_THRESHOLD_PX, MAX_THRESHOLD_PX);
        self.quick_click_max_ms = self.quick_click_max_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.move_throttle_ms = self.move_throttle_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.frame_min_interval_ms = self
            .frame_min_interval_ms
            .clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.long_press_ms = self.long_press_ms.clamp(MIN_LONG_PRESS_MS, MAX_LONG_PRESS_MS);
        self.edge_threshold_narrow_px =
            self.edge_threshold_narrow_px.clamp(MIN_EDGE_PX, MAX_EDGE_PX);
        self.edge_threshold_wide_px = self.edge_threshold_wide_px.clamp(MIN_EDGE_PX, MAX_EDGE_PX);
        self.narrow_viewport_px = self.narrow_viewport_px.max(0.0);
        self.pointer_scroll_interval_ms = self
            .pointer_scroll_interval_ms
            .clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.touch_scroll_interval_ms = self
            .touch_scroll_interval_ms
            .clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.max_scroll_speed_px = self
            .max_scroll_speed_px
            .clamp(MIN_SCROLL_SPEED_PX, MAX_SCROLL_SPEED_PX);
        self.drop_click_guard_ms = self.drop_click_guard_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
    }

    /// Drag-start threshold for the active device class.
    pub fn start_threshold_px(&self, touch_capable: bool) -> f64 {
        if touch_capable {
            self.touch_drag_threshold_px
        } else {
            self.drag_threshold_px
        }
    }

    /// Edge band within which auto-scroll engages, wider on large viewports.
    pub fn edge_threshold_px(&self, viewport_width: f64) -> f64 {
        if viewport_width < self.narrow_viewport_px {
            self.edge_threshold_narrow_px
        } else {
            self.edge_threshold_wide_px
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_tuning_matches_shipped_values() {
        let tuning = DragTuning::default();
        assert_eq!(tuning.drag_threshold_px, 5.0);
        assert_eq!(tuning.touch_drag_threshold_px, 8.0);
        assert_eq!(tuning.quick_click_max_ms, 200);
        assert_eq!(tuning.frame_min_interval_ms, 16);
        assert_eq!(tuning.long_press_ms, 350);
        assert_eq!(tuning.drop_click_guard_ms, 100);
    }

    #[test]
    fn validate_clamps_out_of_range_values() {
        let mut tuning = DragTuning {
            drag_threshold_px: 0.0,
            long_press_ms: 60_000,
            move_throttle_ms: 0,
            max_scroll_speed_px: 9_000.0,
            ..DragTuning::default()
        };
        tuning.validate();
        assert_eq!(tuning.drag_threshold_px, MIN_THRESHOLD_PX);
        assert_eq!(tuning.long_press_ms, MAX_LONG_PRESS_MS);
        assert_eq!(tuning.move_throttle_ms, MIN_INTERVAL_MS);
        assert_eq!(tuning.max_scroll_speed_px, MAX_SCROLL_SPEED_PX);
    }

    #[test]
    fn load_from_missing_path_returns_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let tuning = DragTuning::load_from_path(&dir.path().join("settings.toml"));
        assert_eq!(tuning, DragTuning::default());
    }

    #[test]
    fn load_from_malformed_file_returns_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "drag_threshold_px = \"not a number\"").expect("write");
        let tuning = DragTuning::load_from_path(&path);
        assert_eq!(tuning, DragTuning::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("settings.toml");
        let tuning = DragTuning {
            long_press_ms: 500,
            touch_drag_threshold_px: 12.0,
            ..DragTuning::default()
        };
        tuning.save_to_path(&path).expect("save tuning");
        let loaded = DragTuning::load_from_path(&path);
        assert_eq!(loaded.long_press_ms, 500);
        assert_eq!(loaded.touch_drag_threshold_px, 12.0);
    }

    #[test]
    fn partial_config_falls_back_to_defaults_per_field() {
        let tuning: DragTuning = toml::from_str("long_press_ms = 400").expect("parse");
        assert_eq!(tuning.long_press_ms, 400);
        assert_eq!(tuning.drag_threshold_px, 5.0);
    }

    #[test]
    fn edge_threshold_depends_on_viewport_width() {
        let tuning = DragTuning::default();
        assert_eq!(tuning.edge_threshold_px(400.0), 50.0);
        assert_eq!(tuning.edge_threshold_px(1920.0), 120.0);
    }

    #[test]
    fn start_threshold_depends_on_device_class() {
        let tuning = DragTuning::default();
        assert_eq!(tuning.start_threshold_px(false), 5.0);
        assert_eq!(tuning.start_threshold_px(true), 8.0);
    }
}
