#![forbid(unsafe_code)]

//! Reactive inputs and outputs of the sizing engines.
//!
//! Callers hand engines an [`Observable`] of element handles and one of
//! percent vectors; engines subscribe to both and publish their results into
//! an `Observable` of their own. A [`Subscription`] guard keeps each
//! engine's input callbacks alive until the engine is disposed.
//!
//! Only real changes propagate: setting an equal value neither bumps the
//! version nor wakes an engine.

pub mod observable;

pub use observable::{Observable, Subscription};
