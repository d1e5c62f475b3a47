//! Frame rate cap.

use std::time::{Duration, Instant};

use anyhow::ensure;

/// Paces frames to a target rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    /// Time budget of a frame.
    interval: Duration,
}

impl FramePacer {
    /// Creates a new `FramePacer` for the given frames per second.
    pub fn new(fps: u32) -> anyhow::Result<Self> {
        ensure!(fps > 0, "FPS must not be zero");
        Ok(Self {
            interval: Duration::from_secs(1) / fps,
        })
    }

    /// Returns the time budget of a frame.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns when the frame started at `frame_start` should end.
    pub fn next_deadline(&self, frame_start: Instant) -> Instant {
        frame_start + self.interval
    }

    /// Returns how long to wait before starting the next frame.
    ///
    /// Zero if the frame already overran its budget.
    pub fn remaining(&self, frame_start: Instant, now: Instant) -> Duration {
        self.next_deadline(frame_start)
            .saturating_duration_since(now)
    }
}
