//! Headless frame scheduling
//!
//! Used natively and in tests: frame requests are queued until [`pump`] runs
//! them, standing in for the browser's animation-frame queue.

use super::{FieldLoop, FrameId, FrameScheduler};
use crate::renderer::Surface;

/// Single-slot frame queue with request/cancel counters
#[derive(Debug, Clone, Default)]
pub struct HeadlessScheduler {
    next_id: i32,
    pending: Option<FrameId>,
    requested: u32,
    cancelled: u32,
}

impl HeadlessScheduler {
    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    /// Pop the outstanding request, as the platform does when it fires
    pub fn take_pending(&mut self) -> Option<FrameId> {
        self.pending.take()
    }

    pub fn requested(&self) -> u32 {
        self.requested
    }

    pub fn cancelled(&self) -> u32 {
        self.cancelled
    }
}

impl FrameScheduler for HeadlessScheduler {
    fn request(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending = Some(id);
        self.requested += 1;
        id
    }

    fn cancel(&mut self, id: FrameId) {
        if self.pending == Some(id) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Fire the pending frame, if any. Returns whether a frame ran.
pub fn pump<S: Surface>(lp: &mut FieldLoop<S, HeadlessScheduler>, time_ms: f64) -> bool {
    if lp.scheduler_mut().take_pending().is_none() {
        return false;
    }
    lp.frame(time_ms);
    true
}
