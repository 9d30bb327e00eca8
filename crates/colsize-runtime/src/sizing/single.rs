#![forbid(unsafe_code)]

//! Single-target engine: one element, one percent vector.
//!
//! # State machine
//!
//! - **Unbound**: no element handle. The result is empty and no observer
//!   exists.
//! - **Bound**: a handle is present. One observer watches it and a
//!   recompute is scheduled on entry.
//!
//! Every change of handle identity tears the previous observer down (and
//! cancels its pending frame) before anything new is attached, so one engine
//! never holds two observers. A handle that is present but detached stays
//! Bound with an empty result; its reattachment is picked up by the same
//! observer.

use std::cell::RefCell;
use std::rc::Rc;

use colsize_core::{ElementHandle, SizeObserver, SizeObserverFactory};
use colsize_layout::SizingResult;
use tracing::debug;

use super::{Batch, Engine, EngineCore, degrade, schedule, size_cell};
use crate::reactive::Observable;
use crate::scope::{EngineId, SizingScope};
use crate::stats::EngineStats;

struct SingleState {
    core: EngineCore,
    element: Observable<Option<ElementHandle>>,
    percents: Observable<Vec<f64>>,
    result: Observable<SizingResult>,
    observers: Rc<dyn SizeObserverFactory>,
    observer: RefCell<Option<Box<dyn SizeObserver>>>,
}

impl SingleState {
    /// Follow the element input to `element`.
    fn rebind(self: &Rc<Self>, element: Option<&ElementHandle>) {
        if self.core.is_disposed() {
            return;
        }
        self.release();
        self.core.coalescer.cancel();

        match element {
            Some(handle) => {
                let weak = Rc::downgrade(self);
                let mut observer = self.observers.create(Rc::new(move || {
                    if let Some(state) = weak.upgrade() {
                        schedule(&state);
                    }
                }));
                observer.observe(handle);
                *self.observer.borrow_mut() = Some(observer);
                debug!(engine = %self.core.id(), element = %handle.id(), "column sizing bound");
                schedule(self);
            }
            None => {
                debug!(engine = %self.core.id(), "column sizing unbound");
                self.result.set(SizingResult::empty());
            }
        }
    }
}

impl Engine for SingleState {
    fn core(&self) -> &EngineCore {
        &self.core
    }

    fn kind(&self) -> &'static str {
        "single"
    }

    fn recompute(&self) -> Batch {
        let element = self.element.get();
        let unit = self.core.config().template_unit.as_str();
        let sized = self
            .percents
            .with(|percents| size_cell(element.as_ref(), Some(percents), unit));
        let (result, degraded) = match sized {
            Ok(result) => (result, 0),
            Err(reason) => (degrade(self.core.id(), None, reason), 1),
        };
        self.result.set(result);
        Batch { cells: 1, degraded }
    }

    fn release(&self) {
        if let Some(mut observer) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
    }
}

/// Keeps one element's column widths in sync with its measured width.
///
/// The engine follows two inputs: the element handle and the percent
/// vector. Any change to either, and any size notification for the bound
/// element, schedules one coalesced recompute. Results are published to
/// [`result`](Self::result).
///
/// Dropping the engine disposes it.
///
/// # Example
///
/// ```ignore
/// let element = Observable::new(Some(cell.handle()));
/// let percents = Observable::new(vec![30.0, 70.0]);
/// let sizing = ColumnSizing::new(&scope, &element, &percents);
///
/// frames.run_frame();
/// assert_eq!(sizing.current().template, "144px 336px");
/// ```
pub struct ColumnSizing {
    state: Rc<SingleState>,
}

impl std::fmt::Debug for ColumnSizing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSizing")
            .field("id", &self.id())
            .field("bound", &self.is_bound())
            .field("disposed", &self.is_disposed())
            .field("result", &self.state.result.get())
            .finish()
    }
}

impl ColumnSizing {
    /// Create an engine bound to `element` and `percents`.
    ///
    /// If the handle is already present, a recompute is scheduled right
    /// away. On a torn-down scope the engine starts disposed and its result
    /// stays empty.
    #[must_use]
    pub fn new(
        scope: &SizingScope,
        element: &Observable<Option<ElementHandle>>,
        percents: &Observable<Vec<f64>>,
    ) -> Self {
        let state = Rc::new(SingleState {
            core: EngineCore::new(scope),
            element: element.clone(),
            percents: percents.clone(),
            result: Observable::new(SizingResult::empty()),
            observers: Rc::clone(scope.host().observers()),
            observer: RefCell::new(None),
        });
        let as_engine: Rc<dyn Engine> = state.clone();
        scope.register(Rc::downgrade(&as_engine));

        if !state.core.is_disposed() {
            let weak = Rc::downgrade(&state);
            state.core.keep(element.subscribe(move |handle| {
                if let Some(state) = weak.upgrade() {
                    state.rebind(handle.as_ref());
                }
            }));
            let weak = Rc::downgrade(&state);
            state.core.keep(percents.subscribe(move |_| {
                if let Some(state) = weak.upgrade() {
                    schedule(&state);
                }
            }));
            state.rebind(element.get().as_ref());
        }

        Self { state }
    }

    /// The published result. Readable and subscribable at any time.
    #[must_use]
    pub fn result(&self) -> Observable<SizingResult> {
        self.state.result.clone()
    }

    /// Snapshot of the current result.
    #[must_use]
    pub fn current(&self) -> SizingResult {
        self.state.result.get()
    }

    #[must_use]
    pub fn id(&self) -> EngineId {
        self.state.core.id()
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.state.core.stats()
    }

    /// Whether an observer is currently attached.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.state.observer.borrow().is_some()
    }

    /// Whether a recompute is waiting for the next frame.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.core.is_pending()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.core.is_disposed()
    }

    /// Disconnect, cancel, and stop publishing. Idempotent.
    pub fn dispose(&self) {
        self.state.dispose();
    }
}

impl Drop for ColumnSizing {
    fn drop(&mut self) {
        self.state.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colsize_core::Element;
    use colsize_core::lab::{self, LabDocument, LabFrames};

    struct Fixture {
        doc: LabDocument,
        frames: LabFrames,
        scope: SizingScope,
    }

    fn fixture() -> Fixture {
        let doc = LabDocument::new();
        let frames = LabFrames::new();
        let scope = SizingScope::new(lab::host(&doc, &frames));
        Fixture { doc, frames, scope }
    }

    #[test]
    fn starts_unbound_and_empty() {
        let fx = fixture();
        let element = Observable::new(None);
        let percents = Observable::new(vec![50.0, 50.0]);
        let sizing = ColumnSizing::new(&fx.scope, &element, &percents);

        assert!(!sizing.is_bound());
        assert_eq!(sizing.current(), SizingResult::empty());
        assert_eq!(fx.frames.pending(), 0);
        assert_eq!(fx.doc.created_observers(), 0);
    }

    #[test]
    fn binding_schedules_and_publishes() {
        let fx = fixture();
        let cell = fx.doc.create_element(480.0);
        let element = Observable::new(Some(cell.handle()));
        let percents = Observable::new(vec![30.0, 70.0]);
        let sizing = ColumnSizing::new(&fx.scope, &element, &percents);

        assert!(sizing.is_bound());
        assert!(sizing.is_pending());
        // Nothing is published before the frame runs.
        assert_eq!(sizing.current(), SizingResult::empty());

        fx.frames.run_frame();
        let r = sizing.current();
        assert_eq!(r.container_width_px, 480);
        assert_eq!(r.widths, vec![144, 336]);
        assert_eq!(r.template, "144px 336px");
    }

    #[test]
    fn resize_storm_runs_one_recompute() {
        let fx = fixture();
        let cell = fx.doc.create_element(100.0);
        let element = Observable::new(Some(cell.handle()));
        let percents = Observable::new(vec![50.0, 50.0]);
        let sizing = ColumnSizing::new(&fx.scope, &element, &percents);
        fx.frames.run_frame();
        let before = sizing.stats();

        for w in 1..=25 {
            cell.set_width(100.0 + f64::from(w) * 4.0);
        }
        assert_eq!(fx.frames.pending(), 1);

        assert_eq!(fx.frames.run_frame(), 1);
        let after = sizing.stats();
        assert_eq!(after.recomputes - before.recomputes, 1);
        assert_eq!(after.triggers - before.triggers, 25);
        assert_eq!(after.coalesced - before.coalesced, 24);
        assert_eq!(sizing.current().widths, vec![100, 100]);
        assert_eq!(fx.frames.pending(), 0);
    }

    #[test]
    fn rebinding_replaces_the_observer() {
        let fx = fixture();
        let a = fx.doc.create_element(100.0);
        let b = fx.doc.create_element(200.0);
        let element = Observable::new(Some(a.handle()));
        let percents = Observable::new(vec![50.0, 50.0]);
        let sizing = ColumnSizing::new(&fx.scope, &element, &percents);
        fx.frames.run_frame();

        element.set(Some(b.handle()));
        assert_eq!(fx.doc.watcher_count(a.id()), 0);
        assert_eq!(fx.doc.watcher_count(b.id()), 1);
        assert_eq!(fx.doc.live_observers(), 1);

        fx.frames.run_frame();
        assert_eq!(sizing.current().widths, vec![100, 100]);
    }

    #[test]
    fn unbinding_publishes_empty_immediately() {
        let fx = fixture();
        let a = fx.doc.create_element(100.0);
        let element = Observable::new(Some(a.handle()));
        let percents = Observable::new(vec![50.0, 50.0]);
        let sizing = ColumnSizing::new(&fx.scope, &element, &percents);
        fx.frames.run_frame();
        assert!(sizing.current().is_measured());

        element.set(None);
        assert!(!sizing.is_bound());
        assert_eq!(sizing.current(), SizingResult::empty());
        assert_eq!(fx.doc.registration_count(), 0);
    }

    #[test]
    fn percent_change_alone_recomputes() {
        let fx = fixture();
        let a = fx.doc.create_element(10.0);
        let element = Observable::new(Some(a.handle()));
        let percents = Observable::new(vec![50.0, 50.0]);
        let sizing = ColumnSizing::new(&fx.scope, &element, &percents);
        fx.frames.run_frame();
        assert_eq!(sizing.current().widths, vec![5, 5]);

        percents.set(vec![33.0, 33.0, 34.0]);
        fx.frames.run_frame();
        assert_eq!(sizing.current().widths, vec![3, 3, 4]);
    }

    #[test]
    fn detached_element_stays_bound_with_empty_result() {
        let fx = fixture();
        let a = fx.doc.create_element(200.0);
        let element = Observable::new(Some(a.handle()));
        let percents = Observable::new(vec![25.0, 75.0]);
        let sizing = ColumnSizing::new(&fx.scope, &element, &percents);
        fx.frames.run_frame();

        a.detach();
        fx.frames.run_frame();
        assert!(sizing.is_bound());
        assert_eq!(sizing.current(), SizingResult::empty());
        assert_eq!(sizing.stats().degraded, 1);

        a.attach();
        fx.frames.run_frame();
        assert_eq!(sizing.current().widths, vec![50, 150]);
        assert_eq!(fx.doc.created_observers(), 1);
    }

    #[test]
    fn drop_disposes() {
        let fx = fixture();
        let a = fx.doc.create_element(10.0);
        let element = Observable::new(Some(a.handle()));
        let percents = Observable::new(vec![100.0]);
        let sizing = ColumnSizing::new(&fx.scope, &element, &percents);
        assert_eq!(element.subscriber_count(), 1);

        drop(sizing);
        assert_eq!(fx.frames.pending(), 0);
        assert_eq!(fx.doc.live_observers(), 0);
        assert_eq!(element.subscriber_count(), 0);
        assert_eq!(percents.subscriber_count(), 0);
    }
}
