#![forbid(unsafe_code)]

//! Multi-target engine: keyed elements, keyed percent vectors, one shared
//! observer, one published map per frame.

use std::rc::Rc;

use colsize_layout::SizingResult;
use indexmap::IndexMap;
use tracing::debug;

use super::watch::{HandleMap, KeyedWatch};
use super::{Batch, Engine, EngineCore, degrade, schedule, size_cell};
use crate::reactive::Observable;
use crate::scope::{EngineId, SizingScope};
use crate::stats::EngineStats;

/// Keyed percent vectors, as supplied by the caller.
pub type PercentMap = IndexMap<String, Vec<f64>>;

/// Keyed sizing results, as published by [`ColumnSizingMulti`].
pub type ResultMap = IndexMap<String, SizingResult>;

struct MultiState {
    core: EngineCore,
    handles: Observable<HandleMap>,
    percents: Observable<PercentMap>,
    results: Observable<ResultMap>,
    watch: KeyedWatch,
}

impl MultiState {
    fn resync(self: &Rc<Self>) {
        if self.core.is_disposed() {
            return;
        }
        let watched = self.handles.with(|handles| self.watch.resync(handles));
        debug!(engine = %self.core.id(), watched, "multi sizing watch-list resynced");
        schedule(self);
    }
}

impl Engine for MultiState {
    fn core(&self) -> &EngineCore {
        &self.core
    }

    fn kind(&self) -> &'static str {
        "multi"
    }

    fn recompute(&self) -> Batch {
        let id = self.core.id();
        let unit = self.core.config().template_unit.as_str();
        let mut degraded = 0;
        let next: ResultMap = self.handles.with(|handles| {
            self.percents.with(|percents| {
                handles
                    .iter()
                    .map(|(key, handle)| {
                        let percents = percents.get(key).map(Vec::as_slice);
                        let result = size_cell(handle.as_ref(), percents, unit)
                            .unwrap_or_else(|reason| {
                                degraded += 1;
                                degrade(id, Some(key), reason)
                            });
                        (key.clone(), result)
                    })
                    .collect()
            })
        });
        let cells = next.len();
        self.results.set(next);
        Batch { cells, degraded }
    }

    fn release(&self) {
        self.watch.release();
    }
}

/// Keeps a keyed set of cells' column widths in sync, publishing every key
/// together.
///
/// One size observer watches every present handle. Any size notification,
/// any change to the handle map, and any change to the percent map schedule
/// one coalesced recompute over **all** keys of the handle map; the result
/// map is replaced in a single `set`, so subscribers never see a partially
/// updated batch.
///
/// Per key, a missing handle, a detached element, a width under one pixel,
/// or a missing/empty percent vector yields [`SizingResult::empty`].
///
/// Dropping the engine disposes it.
pub struct ColumnSizingMulti {
    state: Rc<MultiState>,
}

impl std::fmt::Debug for ColumnSizingMulti {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSizingMulti")
            .field("id", &self.id())
            .field("watched", &self.watched_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl ColumnSizingMulti {
    /// Create an engine over `handles` and `percents`.
    ///
    /// The watch-list is synchronized and a recompute scheduled right away.
    #[must_use]
    pub fn new(
        scope: &SizingScope,
        handles: &Observable<HandleMap>,
        percents: &Observable<PercentMap>,
    ) -> Self {
        let core = EngineCore::new(scope);
        let live = !core.is_disposed();
        let observers = Rc::clone(scope.host().observers());

        let state = Rc::new_cyclic(|weak: &std::rc::Weak<MultiState>| {
            let observer = live.then(|| {
                let weak = weak.clone();
                observers.create(Rc::new(move || {
                    if let Some(state) = weak.upgrade() {
                        schedule(&state);
                    }
                }))
            });
            MultiState {
                core,
                handles: handles.clone(),
                percents: percents.clone(),
                results: Observable::new(ResultMap::new()),
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
            let weak = Rc::downgrade(&state);
            state.core.keep(percents.subscribe(move |_| {
                if let Some(state) = weak.upgrade() {
                    schedule(&state);
                }
            }));
            state.resync();
        }

        Self { state }
    }

    /// The published result map. Readable and subscribable at any time.
    #[must_use]
    pub fn results(&self) -> Observable<ResultMap> {
        self.state.results.clone()
    }

    /// Snapshot of one key's result, if the key was in the last batch.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<SizingResult> {
        self.state.results.with(|results| results.get(key).cloned())
    }

    /// Distinct elements currently registered with the observer.
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

    /// Disconnect, cancel, and stop publishing. Idempotent.
    pub fn dispose(&self) {
        self.state.dispose();
    }
}

impl Drop for ColumnSizingMulti {
    fn drop(&mut self) {
        self.state.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colsize_core::lab::{self, LabDocument, LabFrames};

    fn map<V: Clone>(entries: &[(&str, V)]) -> IndexMap<String, V> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn publishes_every_key_in_handle_order() {
        let doc = LabDocument::new();
        let frames = LabFrames::new();
        let scope = SizingScope::new(lab::host(&doc, &frames));

        let a = doc.create_element(100.0);
        let b = doc.create_element(10.0);
        let handles = Observable::new(map(&[
            ("b", Some(b.handle())),
            ("a", Some(a.handle())),
            ("missing", None),
        ]));
        let percents = Observable::new(map(&[
            ("a", vec![33.0, 33.0, 34.0]),
            ("b", vec![50.0, 50.0]),
            ("missing", vec![100.0]),
        ]));
        let sizing = ColumnSizingMulti::new(&scope, &handles, &percents);
        assert_eq!(sizing.watched_count(), 2);

        frames.run_frame();
        let results = sizing.results().get();
        let keys: Vec<&str> = results.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "missing"]);
        assert_eq!(results["a"].widths, vec![33, 33, 34]);
        assert_eq!(results["b"].widths, vec![5, 5]);
        assert_eq!(results["missing"], SizingResult::empty());
    }

    #[test]
    fn key_without_percents_is_empty() {
        let doc = LabDocument::new();
        let frames = LabFrames::new();
        let scope = SizingScope::new(lab::host(&doc, &frames));

        let a = doc.create_element(100.0);
        let handles = Observable::new(map(&[("a", Some(a.handle()))]));
        let percents = Observable::new(PercentMap::new());
        let sizing = ColumnSizingMulti::new(&scope, &handles, &percents);

        frames.run_frame();
        assert_eq!(sizing.get("a"), Some(SizingResult::empty()));
        assert_eq!(sizing.stats().degraded, 1);
        assert_eq!(sizing.get("zzz"), None);
    }

    #[test]
    fn shared_handle_is_observed_once() {
        let doc = LabDocument::new();
        let frames = LabFrames::new();
        let scope = SizingScope::new(lab::host(&doc, &frames));

        let a = doc.create_element(100.0);
        let handles = Observable::new(map(&[("x", Some(a.handle())), ("y", Some(a.handle()))]));
        let percents = Observable::new(PercentMap::new());
        let sizing = ColumnSizingMulti::new(&scope, &handles, &percents);

        assert_eq!(sizing.watched_count(), 1);
        assert_eq!(doc.registration_count(), 1);
        assert_eq!(doc.created_observers(), 1);
    }
}
