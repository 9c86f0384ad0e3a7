//! Input types
//!
//! The host owns the actual input devices; the engine only sees clicks.

pub mod picking;

pub use picking::PointerEvent;
