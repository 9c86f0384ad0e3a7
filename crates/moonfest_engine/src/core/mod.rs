//! Core engine modules
//!
//! Holds the unified scene configuration and the per-session context.

pub mod config;
pub mod context;

pub use context::SceneContext;
