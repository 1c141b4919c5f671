//! Frame scheduling: the "call me before the next paint" primitive

use std::time::{Duration, Instant};

/// Identifies one requested frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

pub trait FrameScheduler {
    /// Ask for a callback on the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Fixed-rate scheduler for a host loop that polls it.
/// Holds at most one pending request; a new request replaces the old one.
pub struct PacedScheduler {
    interval: Duration,
    epoch: Instant,
    last_frame: Option<Instant>,
    pending: Option<FrameHandle>,
    next_id: u64,
}

impl PacedScheduler {
    pub fn new(fps: u32) -> Self {
        Self::starting_at(fps, Instant::now())
    }

    pub fn starting_at(fps: u32, epoch: Instant) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            epoch,
            last_frame: None,
            pending: None,
            next_id: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending frame becomes due, if there is one
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending?;
        Some(self.last_frame.map_or(self.epoch, |last| last + self.interval))
    }

    /// Seconds since the scheduler's epoch
    pub fn timestamp(&self, at: Instant) -> f64 {
        at.saturating_duration_since(self.epoch).as_secs_f64()
    }

    /// Hand out the pending frame if it is due, with its timestamp in seconds
    pub fn take_due(&mut self, now: Instant) -> Option<(FrameHandle, f64)> {
        let deadline = self.next_deadline()?;
        if now < deadline {
            return None;
        }
        let handle = self.pending.take()?;
        self.last_frame = Some(now);
        Some((handle, self.timestamp(now)))
    }
}

impl FrameScheduler for PacedScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
