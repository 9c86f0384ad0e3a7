//! Windowless frame host
//!
//! Steps a [`ManualClock`] at a fixed refresh rate and replays a script of
//! clicks, so a whole session runs deterministically without a display.

use moonfest_engine::foundation::time::ManualClock;
use moonfest_engine::input::PointerEvent;
use moonfest_engine::{FrameHost, HostEvent};
use std::collections::BTreeMap;
use std::time::Duration;

/// Fixed-rate host for demos and smoke runs
#[derive(Debug)]
pub struct HeadlessHost {
    clock: ManualClock,
    frame_time: f32,
    frame: u64,
    total_frames: u64,
    script: BTreeMap<u64, Vec<HostEvent>>,
    pace: bool,
}

impl HeadlessHost {
    /// Host producing `total_frames` frames at `rate_hz`
    pub fn new(clock: ManualClock, rate_hz: f32, total_frames: u64) -> Self {
        Self {
            clock,
            frame_time: 1.0 / rate_hz.max(1.0),
            frame: 0,
            total_frames,
            script: BTreeMap::new(),
            pace: false,
        }
    }

    /// Sleep between frames so the session plays back in real time
    pub fn paced(mut self, pace: bool) -> Self {
        self.pace = pace;
        self
    }

    /// Deliver `event` right before frame `frame`
    pub fn schedule(&mut self, frame: u64, event: HostEvent) {
        self.script.entry(frame).or_default().push(event);
    }

    /// Click at pixel (`x`, `y`) of a `width` x `height` viewport before frame `frame`
    pub fn schedule_click(&mut self, frame: u64, x: f64, y: f64, width: u32, height: u32) {
        self.schedule(frame, HostEvent::Click(PointerEvent::new(x, y, width, height)));
    }

    /// Frames handed out so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl FrameHost for HeadlessHost {
    fn next_frame(&mut self) -> Option<Vec<HostEvent>> {
        if self.frame >= self.total_frames {
            return None;
        }
        if self.frame > 0 {
            self.clock.advance(self.frame_time);
            if self.pace {
                std::thread::sleep(Duration::from_secs_f32(self.frame_time));
            }
        }
        let events = self.script.remove(&self.frame).unwrap_or_default();
        self.frame += 1;
        Some(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moonfest_engine::foundation::time::SessionClock;

    #[test]
    fn test_fixed_rate_and_script() {
        let clock = ManualClock::new();
        let mut host = HeadlessHost::new(clock.clone(), 10.0, 3);
        host.schedule_click(1, 400.0, 300.0, 800, 600);
        host.schedule(1, HostEvent::CloseRequested);

        assert_eq!(host.next_frame(), Some(vec![]));
        assert_eq!(clock.elapsed(), 0.0);

        let events = host.next_frame().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], HostEvent::Click(_)));
        assert!((clock.elapsed() - 0.1).abs() < 1e-6);

        assert_eq!(host.next_frame(), Some(vec![]));
        assert_eq!(host.next_frame(), None);
        assert_eq!(host.frame(), 3);
    }
}
