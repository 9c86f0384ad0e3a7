//! Per-frame and per-click systems operating on a [`SceneContext`]
//!
//! [`SceneContext`]: crate::core::SceneContext

pub mod frame_scheduler;
pub mod picking_system;

pub use frame_scheduler::{FrameError, FrameReport, FrameScheduler};
pub use picking_system::{PickOutcome, PickingSystem};
