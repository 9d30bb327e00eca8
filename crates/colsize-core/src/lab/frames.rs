#![forbid(unsafe_code)]

//! Manually pumped frame scheduler.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::frame::{FrameCallback, FrameScheduler, FrameToken};

#[derive(Default)]
struct FramesShared {
    next_token: Cell<u64>,
    queue: RefCell<Vec<(FrameToken, FrameCallback)>>,
    requested: Cell<u64>,
    cancelled: Cell<u64>,
    ran: Cell<u64>,
    /// When set, `cancel_frame` is recorded but the callback still runs.
    ignore_cancel: Cell<bool>,
}

/// A [`FrameScheduler`] driven explicitly by the test.
///
/// Cloning yields a handle to the **same** queue.
///
/// # Invariants
///
/// 1. Callbacks never run inside `request_frame`.
/// 2. `run_frame` runs exactly the callbacks queued before it was called;
///    callbacks scheduled while a frame runs land in the next frame.
#[derive(Clone, Default)]
pub struct LabFrames {
    shared: Rc<FramesShared>,
}

impl std::fmt::Debug for LabFrames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabFrames")
            .field("pending", &self.pending())
            .field("requested", &self.requested())
            .field("ran", &self.ran())
            .finish()
    }
}

impl LabFrames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a host that does not honor cancellation.
    #[must_use]
    pub fn ignoring_cancel(self) -> Self {
        self.shared.ignore_cancel.set(true);
        self
    }

    /// Run every callback queued so far. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let batch = std::mem::take(&mut *self.shared.queue.borrow_mut());
        let count = batch.len();
        for (_, callback) in batch {
            callback();
        }
        self.shared.ran.set(self.shared.ran.get() + count as u64);
        count
    }

    /// Callbacks waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.queue.borrow().len()
    }

    /// Total `request_frame` calls.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.shared.requested.get()
    }

    /// Total `cancel_frame` calls that removed a queued callback.
    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.shared.cancelled.get()
    }

    /// Total callbacks run.
    #[must_use]
    pub fn ran(&self) -> u64 {
        self.shared.ran.get()
    }
}

impl FrameScheduler for LabFrames {
    fn request_frame(&self, callback: FrameCallback) -> FrameToken {
        let next = self.shared.next_token.get() + 1;
        self.shared.next_token.set(next);
        self.shared.requested.set(self.shared.requested.get() + 1);
        let token = FrameToken(next);
        self.shared.queue.borrow_mut().push((token, callback));
        token
    }

    fn cancel_frame(&self, token: FrameToken) {
        if self.shared.ignore_cancel.get() {
            return;
        }
        let mut queue = self.shared.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|(queued, _)| *queued != token);
        if queue.len() < before {
            self.shared.cancelled.set(self.shared.cancelled.get() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_wait_for_run_frame() {
        let frames = LabFrames::new();
        let hit = Rc::new(Cell::new(false));
        let hit_clone = Rc::clone(&hit);
        frames.request_frame(Box::new(move || hit_clone.set(true)));
        assert!(!hit.get());
        assert_eq!(frames.pending(), 1);

        assert_eq!(frames.run_frame(), 1);
        assert!(hit.get());
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn cancel_removes_callback() {
        let frames = LabFrames::new();
        let hit = Rc::new(Cell::new(false));
        let hit_clone = Rc::clone(&hit);
        let token = frames.request_frame(Box::new(move || hit_clone.set(true)));
        frames.cancel_frame(token);
        assert_eq!(frames.run_frame(), 0);
        assert!(!hit.get());
        assert_eq!(frames.cancelled(), 1);

        // Unknown token is ignored.
        frames.cancel_frame(FrameToken(999));
        assert_eq!(frames.cancelled(), 1);
    }

    #[test]
    fn nested_requests_land_in_next_frame() {
        let frames = LabFrames::new();
        let count = Rc::new(Cell::new(0u32));
        let inner_frames = frames.clone();
        let count_clone = Rc::clone(&count);
        frames.request_frame(Box::new(move || {
            count_clone.set(count_clone.get() + 1);
            let again = Rc::clone(&count_clone);
            inner_frames.request_frame(Box::new(move || again.set(again.get() + 1)));
        }));

        assert_eq!(frames.run_frame(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(frames.pending(), 1);
        assert_eq!(frames.run_frame(), 1);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn ignoring_cancel_still_runs() {
        let frames = LabFrames::new().ignoring_cancel();
        let hit = Rc::new(Cell::new(false));
        let hit_clone = Rc::clone(&hit);
        let token = frames.request_frame(Box::new(move || hit_clone.set(true)));
        frames.cancel_frame(token);
        frames.run_frame();
        assert!(hit.get());
    }
}
