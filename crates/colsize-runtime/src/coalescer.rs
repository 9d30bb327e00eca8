#![forbid(unsafe_code)]

//! Frame coalescing: many requests, one frame.
//!
//! A [`FrameCoalescer`] sits between high-frequency triggers (size
//! notifications, input changes) and the host's [`FrameScheduler`]. The
//! first request schedules one frame; every further request before that
//! frame runs is absorbed.
//!
//! # Invariants
//!
//! 1. At most one frame is pending per coalescer.
//! 2. A frame callback only does work if it [`claim`](FrameCoalescer::claim)s
//!    the ticket it was scheduled with. Cancelled or superseded callbacks
//!    that still fire (hosts that ignore cancellation) claim nothing.
//! 3. `cancel` leaves the coalescer idle, ready for a fresh request.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use colsize_core::{FrameScheduler, FrameToken};

/// Identifies one scheduled frame within one coalescer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket(u64);

/// Outcome of [`FrameCoalescer::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// A new frame was scheduled.
    Scheduled(FrameToken),
    /// A frame was already pending; this request rides along with it.
    Coalesced,
}

/// Collapses repeated requests into a single pending frame.
pub struct FrameCoalescer {
    frames: Rc<dyn FrameScheduler>,
    pending: Cell<Option<(FrameTicket, FrameToken)>>,
    next_ticket: Cell<u64>,
}

impl fmt::Debug for FrameCoalescer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameCoalescer")
            .field("pending", &self.pending.get())
            .finish()
    }
}

impl FrameCoalescer {
    #[must_use]
    pub fn new(frames: Rc<dyn FrameScheduler>) -> Self {
        Self {
            frames,
            pending: Cell::new(None),
            next_ticket: Cell::new(0),
        }
    }

    /// Schedule `run` for the next frame unless a frame is already pending.
    ///
    /// `run` receives the ticket it must pass to [`claim`](Self::claim).
    pub fn request(&self, run: impl FnOnce(FrameTicket) + 'static) -> Request {
        if self.pending.get().is_some() {
            return Request::Coalesced;
        }
        let ticket = FrameTicket(self.next_ticket.get() + 1);
        self.next_ticket.set(ticket.0);
        let token = self.frames.request_frame(Box::new(move || run(ticket)));
        self.pending.set(Some((ticket, token)));
        Request::Scheduled(token)
    }

    /// Called from the frame callback. Returns `true` (and clears the
    /// pending slot) only if `ticket` is the currently pending frame.
    pub fn claim(&self, ticket: FrameTicket) -> bool {
        match self.pending.get() {
            Some((pending, _)) if pending == ticket => {
                self.pending.set(None);
                true
            }
            _ => false,
        }
    }

    /// Cancel the pending frame, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.pending.take() {
            Some((_, token)) => {
                self.frames.cancel_frame(token);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}
