#![forbid(unsafe_code)]

//! Core: host ports for measuring elements, observing size changes, and
//! scheduling frame-aligned work.
//!
//! The sizing engines in `colsize-runtime` never talk to a real document.
//! Everything they need from the host is expressed as a small trait here:
//!
//! - [`Element`] / [`ElementHandle`]: a measurable surface with identity.
//! - [`SizeObserver`] / [`SizeObserverFactory`]: box-size change notification.
//! - [`FrameScheduler`] / [`FrameToken`]: next-frame callbacks and their
//!   cancellation.
//! - [`Host`]: the bundle of ports handed to an owning scope.
//!
//! With the `test-helpers` feature, [`lab`] provides a deterministic
//! in-memory host where frames only run when the test says so.

pub mod element;
pub mod frame;
pub mod host;
pub mod observer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod lab;

pub use element::{Element, ElementHandle, ElementId};
pub use frame::{FrameCallback, FrameScheduler, FrameToken};
pub use host::Host;
pub use observer::{ResizeCallback, SizeObserver, SizeObserverFactory};
