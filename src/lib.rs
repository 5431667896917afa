//! Headless drag-and-drop engine for the Join kanban task board.
//!
//! The engine is the board's only stateful subsystem: it classifies
//! pointer/touch gestures (click versus drag versus scroll), runs the drag
//! lifecycle with clone tracking, drop-zone highlighting and edge
//! auto-scroll, and hands successful drops to the Firebase-backed status
//! updater.
//!
//! It is headless by construction: inputs are plain event values carrying
//! coordinates and millisecond timestamps, outputs are [`effects::Effect`]
//! batches a rendering host replays against its surface. No clock is read
//! internally, so every transition is deterministic under test.

pub mod board;
pub mod effects;
pub mod firebase;
pub mod geometry;
pub mod logging;
pub mod pointer;
pub mod scroll;
pub mod session;
pub mod settings;
pub mod touch;
pub mod types;

pub use board::{BoardMap, Rect, standard_columns};
pub use effects::Effect;
pub use firebase::{FirebaseTaskStore, TaskCache, UserScope, persist_drop};
pub use geometry::Point;
pub use pointer::{DragPhase, PointerDragEngine, PointerEvent};
pub use scroll::Viewport;
pub use settings::DragTuning;
pub use touch::{TouchDragEngine, TouchEvent};
pub use types::{Task, TaskStatus};
