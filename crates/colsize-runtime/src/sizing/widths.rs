#![forbid(unsafe_code)]

//! Width-only observer: keyed elements in, measured widths out.
//!
//! Shares [`KeyedWatch`] and the frame coalescing with
//! [`ColumnSizingMulti`](super::ColumnSizingMulti), so both observation paths
//! resync and batch identically. No allocation happens here.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use super::watch::{HandleMap, KeyedWatch};
use super::{Batch, Engine, EngineCore, schedule};
use crate::reactive::Observable;
use crate::scope::{EngineId, SizingScope};
use crate::stats::EngineStats;

/// Keyed measured widths, as published by [`CellWidths`].
pub type WidthMap = IndexMap<String, f64>;

struct WidthsState {
    core: EngineCore,
    handles: Observable<HandleMap>,
    widths: Observable<WidthMap>,
    watch: KeyedWatch,
}

impl WidthsState {
    fn resync(self: &Rc<Self>) {
        if self.core.is_disposed() {
            return;
        }
        let watched = self.handles.with(|handles| self.watch.resync(handles));
        debug!(engine = %self.core.id(), watched, "cell widths watch-list resynced");
        schedule(self);
    }
}

impl Engine for WidthsState {
    fn core(&self) -> &EngineCore {
        &self.core
    }

    fn kind(&self) -> &'static str {
        "widths"
    }

    fn recompute(&self) -> Batch {
        let mut degraded = 0;
        let next: WidthMap = self.handles.with(|handles| {
            handles
                .iter()
                .map(|(key, handle)| {
                    let width = handle.as_ref().map_or(0.0, |h| h.width_or_zero());
                    if width == 0.0 {
                        degraded += 1;
                    }
                    (key.clone(), width)
                })
                .collect()
        });
        let cells = next.len();
        self.widths.set(next);
        Batch { cells, degraded }
    }

    fn release(&self) {
        self.watch.release();
    }
}

/// Publishes the measured content width of every keyed element.
///
/// Missing, detached, and collapsed elements report `0.0`. Widths are not
/// rounded; callers doing their own allocation decide how to quantize.
/// Dropping the engine disposes it.
pub struct CellWidths {
    state: Rc<WidthsState>,
}

impl std::fmt::Debug for CellWidths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellWidths")
            .field("id", &self.id())
            .field("watched", &self.watched_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl CellWidths {
    #[must_use]
    pub fn new(scope: &SizingScope, handles: &Observable<HandleMap>) -> Self {
        let core = EngineCore::new(scope);
        let live = !core.is_disposed();
        let observers = Rc::clone(scope.host().observers());

        let state = Rc::new_cyclic(|weak: &std::rc::Weak<WidthsState>| {
            let observer = live.then(|| {
                let weak = weak.clone();
                observers.create(Rc::new(move || {
                    if let Some(state) = weak.upgrade() {
                        schedule(&state);
                    }
                }))
            });
            WidthsState {
                core,
                handles: handles.clone(),
                widths: Observable::new(WidthMap::new()),
                watch: KeyedWatch::new(observer),
            }
        });
        let as_engine: Rc<dyn Engine> = state.clone();
        scope.register(Rc::downgrade(&as_engine));

        if live {
            let weak = Rc::downgrade(&state);
            state.core.keep(handles.subscribe(move |_| {
                if let Some(state) = weak.upgrade() {
                    state.resync();
                }
            }));
            state.resync();
        }

        Self { state }
    }

    /// The published width map. Readable and subscribable at any time.
    #[must_use]
    pub fn widths(&self) -> Observable<WidthMap> {
        self.state.widths.clone()
    }

    /// Last published width for `key`, or `0.0` if the key is unknown.
    #[must_use]
    pub fn width(&self, key: &str) -> f64 {
        self.state
            .widths
            .with(|widths| widths.get(key).copied().unwrap_or(0.0))
    }

    #[must_use]
    pub fn watched_count(&self) -> usize {
        self.state.watch.watched()
    }

    #[must_use]
    pub fn id(&self) -> EngineId {
        self.state.core.id()
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.state.core.stats()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.core.is_pending()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.core.is_disposed()
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}

impl Drop for CellWidths {
    fn drop(&mut self) {
        self.state.dispose();
    }
}
