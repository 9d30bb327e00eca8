#![forbid(unsafe_code)]

//! Shared, version-tracked values with change notification.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value in `Rc<RefCell<..>>`. Subscribers are held
//! as `Weak` callbacks; the strong reference lives in the [`Subscription`]
//! guard returned by [`subscribe`](Observable::subscribe), so dropping the
//! guard unsubscribes. Dead entries are pruned lazily on the next
//! notification.
//!
//! # Invariants
//!
//! 1. `version` increments exactly once per `set` that changes the value.
//! 2. Setting a value equal to the current one is a no-op.
//! 3. Subscribers are notified in registration order.
//! 4. No borrow of the observable is held while a subscriber runs, so a
//!    subscriber may read or even `set` the same observable.
//!
//! # Failure Modes
//!
//! - **Subscriber sets the same observable**: the nested `set` notifies
//!   immediately (depth-first); the outer notification loop then continues
//!   with the value it captured.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// A shared, observable value.
///
/// Cloning an `Observable` creates a new handle to the **same** value.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference.
    ///
    /// # Panics
    ///
    /// Panics if the closure calls [`set`](Self::set) on this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        let (snapshot, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
            inner.subscribers.retain(|s| s.strong_count() > 0);
            let callbacks: Vec<Rc<Callback<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.value.clone(), callbacks)
        };
        for callback in callbacks {
            callback(&snapshot);
        }
    }

    /// Mutate a copy of the value in place and [`set`](Self::set) it.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Register `callback` to run after every change.
    ///
    /// The callback stays registered until the returned guard is dropped.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of changes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }
}

/// RAII guard for an [`Observable`] subscription.
pub struct Subscription {
    _guard: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
