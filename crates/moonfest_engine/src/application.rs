//! Host boundary
//!
//! The engine does not own a window or an event loop. A [`FrameHost`] does:
//! it paces frames to the display and collects the input that arrived since
//! the previous one.

use crate::input::PointerEvent;

/// Something the host observed between two frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Primary button click
    Click(PointerEvent),

    /// The view was hidden (minimized, tab switched) or shown again
    VisibilityChanged {
        /// `true` while hidden
        hidden: bool,
    },

    /// User asked to close the view
    CloseRequested,
}

/// Paces frames and delivers input
pub trait FrameHost {
    /// Wait for the next display refresh
    ///
    /// Returns the events gathered since the previous call, or `None` once the
    /// host has shut down.
    fn next_frame(&mut self) -> Option<Vec<HostEvent>>;
}
