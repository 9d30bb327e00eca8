#![forbid(unsafe_code)]

//! Box-size change notification port.
//!
//! Mirrors the shape of a browser `ResizeObserver`: one callback per
//! observer, any number of observed elements, and a `disconnect` that stops
//! observing all of them at once.

use std::rc::Rc;

use crate::element::ElementHandle;

/// Callback invoked when any observed element's rendered box changes.
pub type ResizeCallback = Rc<dyn Fn()>;

/// A live size observer owned by exactly one engine.
pub trait SizeObserver {
    /// Start observing `target`. Observing an element twice is a no-op.
    fn observe(&mut self, target: &ElementHandle);

    /// Stop observing every element.
    fn disconnect(&mut self);
}

/// Creates [`SizeObserver`]s bound to a callback.
pub trait SizeObserverFactory {
    fn create(&self, on_resize: ResizeCallback) -> Box<dyn SizeObserver>;
}
