#![forbid(unsafe_code)]

//! Bundle of host ports.

use std::fmt;
use std::rc::Rc;

use crate::frame::FrameScheduler;
use crate::observer::SizeObserverFactory;

/// The host capabilities a sizing scope needs.
///
/// Cheaply cloneable; clones share the same ports.
#[derive(Clone)]
pub struct Host {
    frames: Rc<dyn FrameScheduler>,
    observers: Rc<dyn SizeObserverFactory>,
}

impl Host {
    #[must_use]
    pub fn new(frames: Rc<dyn FrameScheduler>, observers: Rc<dyn SizeObserverFactory>) -> Self {
        Self { frames, observers }
    }

    #[must_use]
    pub fn frames(&self) -> &Rc<dyn FrameScheduler> {
        &self.frames
    }

    #[must_use]
    pub fn observers(&self) -> &Rc<dyn SizeObserverFactory> {
        &self.observers
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
