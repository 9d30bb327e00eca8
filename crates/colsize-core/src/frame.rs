#![forbid(unsafe_code)]

//! Next-frame scheduling port.
//!
//! A [`FrameScheduler`] runs a callback once, aligned to the host's next
//! rendering frame, and lets the caller cancel it before it fires. This is
//! the only suspension point of the sizing engines.

use std::fmt;

/// Callback run on the next frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Opaque handle to a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

impl fmt::Display for FrameToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Host primitive for frame-aligned callbacks.
///
/// Implementations must never run a callback synchronously from inside
/// [`request_frame`](FrameScheduler::request_frame).
pub trait FrameScheduler {
    /// Schedule `callback` to run once on the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameToken;

    /// Cancel a previously scheduled callback. Unknown or already-fired
    /// tokens are ignored.
    fn cancel_frame(&self, token: FrameToken);
}
