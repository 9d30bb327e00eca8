#![forbid(unsafe_code)]

//! Owning context for sizing engines.
//!
//! A [`SizingScope`] lives as long as the UI component that uses it. It
//! carries the host ports and configuration handed to every engine created
//! in it, numbers those engines, and tears them all down together.
//!
//! There is no process-wide state: two scopes never share counters or
//! registries, so independent tests cannot observe each other.
//!
//! # Invariants
//!
//! 1. After [`teardown`](SizingScope::teardown), every engine created in the
//!    scope is disposed, and engines created afterwards start disposed.
//! 2. The scope holds engines weakly; dropping an engine handle disposes it
//!    without involving the scope.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use colsize_core::Host;
use tracing::debug;

use crate::config::SizingConfig;
use crate::sizing::Engine;

/// Identity of an engine within its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(pub u64);

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine#{}", self.0)
    }
}

struct ScopeInner {
    host: Host,
    config: SizingConfig,
    next_engine: Cell<u64>,
    engines: RefCell<Vec<Weak<dyn Engine>>>,
    torn_down: Cell<bool>,
}

/// Owning context for a group of sizing engines.
///
/// Cloning yields a handle to the **same** scope.
#[derive(Clone)]
pub struct SizingScope {
    inner: Rc<ScopeInner>,
}

impl fmt::Debug for SizingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizingScope")
            .field("config", &self.inner.config)
            .field("live_engines", &self.live_engines())
            .field("torn_down", &self.inner.torn_down.get())
            .finish()
    }
}

impl SizingScope {
    /// Create a scope with the default [`SizingConfig`].
    #[must_use]
    pub fn new(host: Host) -> Self {
        Self::with_config(host, SizingConfig::default())
    }

    #[must_use]
    pub fn with_config(host: Host, config: SizingConfig) -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                host,
                config,
                next_engine: Cell::new(0),
                engines: RefCell::new(Vec::new()),
                torn_down: Cell::new(false),
            }),
        }
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        &self.inner.host
    }

    #[must_use]
    pub fn config(&self) -> &SizingConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.get()
    }

    /// Engines created in this scope that are still alive and not disposed.
    #[must_use]
    pub fn live_engines(&self) -> usize {
        self.inner
            .engines
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|engine| !engine.core().is_disposed())
            .count()
    }

    /// Dispose every engine created in this scope. Idempotent.
    pub fn teardown(&self) {
        if self.inner.torn_down.replace(true) {
            return;
        }
        let engines = std::mem::take(&mut *self.inner.engines.borrow_mut());
        let mut disposed = 0usize;
        for engine in engines.iter().filter_map(Weak::upgrade) {
            engine.dispose();
            disposed += 1;
        }
        debug!(disposed, "sizing scope torn down");
    }

    pub(crate) fn next_engine_id(&self) -> EngineId {
        let next = self.inner.next_engine.get() + 1;
        self.inner.next_engine.set(next);
        EngineId(next)
    }

    pub(crate) fn register(&self, engine: Weak<dyn Engine>) {
        if self.is_torn_down() {
            return;
        }
        let mut engines = self.inner.engines.borrow_mut();
        engines.retain(|e| e.strong_count() > 0);
        engines.push(engine);
    }
}
