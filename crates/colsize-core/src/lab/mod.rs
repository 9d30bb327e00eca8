#![forbid(unsafe_code)]

//! Deterministic in-memory host for tests.
//!
//! - [`LabDocument`]: creates [`LabElement`]s and acts as the
//!   [`SizeObserverFactory`]. Changing an element's width notifies every
//!   observer currently watching it, synchronously.
//! - [`LabFrames`]: a [`FrameScheduler`](crate::FrameScheduler) whose
//!   callbacks only run when the test calls [`LabFrames::run_frame`].
//!
//! # Example
//!
//! ```ignore
//! use colsize_core::lab::{LabDocument, LabFrames};
//!
//! let doc = LabDocument::new();
//! let frames = LabFrames::new();
//! let host = colsize_core::lab::host(&doc, &frames);
//!
//! let cell = doc.create_element(480.0);
//! assert_eq!(cell.handle().measurable_width(), Some(480.0));
//! assert_eq!(frames.pending(), 0);
//! # let _ = host;
//! ```

mod frames;

pub use frames::LabFrames;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::element::{Element, ElementHandle, ElementId};
use crate::host::Host;
use crate::observer::{ResizeCallback, SizeObserver, SizeObserverFactory};

/// Build a [`Host`] from lab components.
#[must_use]
pub fn host(doc: &LabDocument, frames: &LabFrames) -> Host {
    Host::new(Rc::new(frames.clone()), Rc::new(doc.clone()))
}

// ─── Document ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct DocShared {
    next_element: Cell<u64>,
    created_observers: Cell<u64>,
    observers: RefCell<Vec<Weak<ObserverSlot>>>,
}

impl DocShared {
    /// Callbacks of live observers watching `id`, in creation order.
    fn watchers(&self, id: ElementId) -> Vec<ResizeCallback> {
        let mut observers = self.observers.borrow_mut();
        observers.retain(|slot| slot.strong_count() > 0);
        observers
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|slot| slot.watched.borrow().contains(&id))
            .map(|slot| Rc::clone(&slot.callback))
            .collect()
    }

    fn notify(&self, id: ElementId) {
        // Borrows are released before any callback runs.
        for callback in self.watchers(id) {
            callback();
        }
    }
}

/// In-memory document: element factory and size-observer factory.
///
/// Cloning yields a handle to the **same** document.
#[derive(Clone, Default)]
pub struct LabDocument {
    shared: Rc<DocShared>,
}

impl std::fmt::Debug for LabDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabDocument")
            .field("elements", &self.shared.next_element.get())
            .field("created_observers", &self.shared.created_observers.get())
            .finish()
    }
}

impl LabDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an attached element with the given content width.
    #[must_use]
    pub fn create_element(&self, width: f64) -> Rc<LabElement> {
        let next = self.shared.next_element.get() + 1;
        self.shared.next_element.set(next);
        Rc::new(LabElement {
            id: ElementId(next),
            width: Cell::new(width),
            attached: Cell::new(true),
            doc: Rc::downgrade(&self.shared),
        })
    }

    /// Number of live observers currently watching `id`.
    #[must_use]
    pub fn watcher_count(&self, id: ElementId) -> usize {
        self.shared.watchers(id).len()
    }

    /// Total `(observer, element)` registrations across live observers.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.shared
            .observers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|slot| slot.watched.borrow().len())
            .sum()
    }

    /// Number of observers ever created through this document.
    #[must_use]
    pub fn created_observers(&self) -> u64 {
        self.shared.created_observers.get()
    }

    /// Number of observers not yet dropped.
    #[must_use]
    pub fn live_observers(&self) -> usize {
        self.shared
            .observers
            .borrow()
            .iter()
            .filter(|slot| slot.strong_count() > 0)
            .count()
    }
}

impl SizeObserverFactory for LabDocument {
    fn create(&self, on_resize: ResizeCallback) -> Box<dyn SizeObserver> {
        let count = self.shared.created_observers.get() + 1;
        self.shared.created_observers.set(count);
        let slot = Rc::new(ObserverSlot {
            callback: on_resize,
            watched: RefCell::new(Vec::new()),
        });
        self.shared.observers.borrow_mut().push(Rc::downgrade(&slot));
        Box::new(LabObserver { slot })
    }
}

// ─── Observers ───────────────────────────────────────────────────────────────

struct ObserverSlot {
    callback: ResizeCallback,
    watched: RefCell<Vec<ElementId>>,
}

/// Observer handed out by [`LabDocument`]. Dropping it unregisters it.
struct LabObserver {
    slot: Rc<ObserverSlot>,
}

impl SizeObserver for LabObserver {
    fn observe(&mut self, target: &ElementHandle) {
        let mut watched = self.slot.watched.borrow_mut();
        let id = target.id();
        if !watched.contains(&id) {
            watched.push(id);
        }
    }

    fn disconnect(&mut self) {
        self.slot.watched.borrow_mut().clear();
    }
}

// ─── Elements ────────────────────────────────────────────────────────────────

/// A measurable in-memory element.
#[derive(Debug)]
pub struct LabElement {
    id: ElementId,
    width: Cell<f64>,
    attached: Cell<bool>,
    doc: Weak<DocShared>,
}

impl LabElement {
    /// A handle to this element for the engines.
    #[must_use]
    pub fn handle(self: &Rc<Self>) -> ElementHandle {
        ElementHandle::from(Rc::clone(self))
    }

    /// Change the content width. Observers are notified only on change.
    pub fn set_width(&self, width: f64) {
        if self.width.get().to_bits() == width.to_bits() {
            return;
        }
        self.width.set(width);
        self.notify();
    }

    /// Fire a size notification without changing the width (reflow).
    pub fn notify(&self) {
        if let Some(doc) = self.doc.upgrade() {
            doc.notify(self.id);
        }
    }

    /// Remove the element from the rendered tree. Notifies observers.
    pub fn detach(&self) {
        if self.attached.replace(false) {
            self.notify();
        }
    }

    /// Re-insert the element into the rendered tree. Notifies observers.
    pub fn attach(&self) {
        if !self.attached.replace(true) {
            self.notify();
        }
    }
}

impl Element for LabElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn content_width(&self) -> f64 {
        if self.attached.get() {
            self.width.get()
        } else {
            0.0
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
