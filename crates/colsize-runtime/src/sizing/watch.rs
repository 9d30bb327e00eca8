#![forbid(unsafe_code)]

//! One shared size observer over a keyed set of handles.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use colsize_core::{ElementHandle, ElementId, SizeObserver};
use indexmap::IndexMap;

/// Keyed element handles, as supplied by the caller.
pub type HandleMap = IndexMap<String, Option<ElementHandle>>;

/// Watch-list shared by [`ColumnSizingMulti`](super::ColumnSizingMulti) and
/// [`CellWidths`](super::CellWidths).
///
/// Resync is all-or-nothing: disconnect everything, then observe every
/// present handle. Nothing removed from the map can stay registered.
pub(crate) struct KeyedWatch {
    observer: RefCell<Option<Box<dyn SizeObserver>>>,
    watched: Cell<usize>,
}

impl KeyedWatch {
    pub(crate) fn new(observer: Option<Box<dyn SizeObserver>>) -> Self {
        Self {
            observer: RefCell::new(observer),
            watched: Cell::new(0),
        }
    }

    /// Re-register the observer against `handles`. Returns how many distinct
    /// elements are now watched.
    pub(crate) fn resync(&self, handles: &HandleMap) -> usize {
        let mut slot = self.observer.borrow_mut();
        let Some(observer) = slot.as_mut() else {
            return 0;
        };
        observer.disconnect();
        let mut seen: HashSet<ElementId> = HashSet::with_capacity(handles.len());
        for handle in handles.values().flatten() {
            if seen.insert(handle.id()) {
                observer.observe(handle);
            }
        }
        self.watched.set(seen.len());
        seen.len()
    }

    /// Disconnect and drop the observer. Later resyncs are no-ops.
    pub(crate) fn release(&self) {
        if let Some(mut observer) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
        self.watched.set(0);
    }

    pub(crate) fn watched(&self) -> usize {
        self.watched.get()
    }
}
