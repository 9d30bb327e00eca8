#![forbid(unsafe_code)]

//! Sizing engines.
//!
//! - [`ColumnSizing`]: one element, one percent vector, one result.
//! - [`ColumnSizingMulti`]: keyed elements and keyed percent vectors, one
//!   shared observer, one result map published per frame.
//! - [`CellWidths`]: keyed elements, measured widths only.
//!
//! # Shared machinery
//!
//! Every engine is an `Rc`-owned state implementing [`Engine`]. Triggers
//! (size notifications, input changes) go through [`schedule`], which asks
//! the engine's [`FrameCoalescer`](crate::FrameCoalescer) for a frame; the
//! frame runs [`Engine::recompute`] once, however many triggers arrived.
//! Host callbacks only hold `Weak` references to the state, and every entry
//! point checks the disposed flag first.
//!
//! # Invariants
//!
//! 1. A recompute reads each input once and publishes with a single `set`.
//! 2. After `dispose`, no frame is pending, no observer is connected, no
//!    input subscription is alive, and no result is published.

mod multi;
mod single;
mod watch;
mod widths;

pub use multi::{ColumnSizingMulti, PercentMap, ResultMap};
pub use single::ColumnSizing;
pub use watch::HandleMap;
pub use widths::{CellWidths, WidthMap};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use colsize_core::ElementHandle;
use colsize_layout::{SizingResult, allocate_with_unit};
use tracing::{debug, trace};

use crate::coalescer::{FrameCoalescer, FrameTicket, Request};
use crate::config::SizingConfig;
use crate::degraded::Degraded;
use crate::reactive::Subscription;
use crate::scope::{EngineId, SizingScope};
use crate::stats::EngineStats;

/// Outcome of one recompute pass.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Batch {
    pub cells: usize,
    pub degraded: usize,
}

/// State common to every engine.
pub(crate) struct EngineCore {
    id: EngineId,
    config: SizingConfig,
    coalescer: FrameCoalescer,
    disposed: Cell<bool>,
    stats: Cell<EngineStats>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl EngineCore {
    pub(crate) fn new(scope: &SizingScope) -> Self {
        Self {
            id: scope.next_engine_id(),
            config: scope.config().clone(),
            coalescer: FrameCoalescer::new(Rc::clone(scope.host().frames())),
            disposed: Cell::new(scope.is_torn_down()),
            stats: Cell::new(EngineStats::default()),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> EngineId {
        self.id
    }

    #[inline]
    pub(crate) fn config(&self) -> &SizingConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub(crate) fn stats(&self) -> EngineStats {
        self.stats.get()
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.coalescer.is_pending()
    }

    fn bump(&self, f: impl FnOnce(&mut EngineStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    /// Keep an input subscription alive until dispose.
    pub(crate) fn keep(&self, subscription: Subscription) {
        self.subscriptions.borrow_mut().push(subscription);
    }
}

/// Implemented by each engine's shared state.
pub(crate) trait Engine {
    fn core(&self) -> &EngineCore;

    /// Short engine kind for trace events.
    fn kind(&self) -> &'static str;

    /// Read inputs once, compute, publish once.
    fn recompute(&self) -> Batch;

    /// Disconnect host observers.
    fn release(&self);

    /// Tear down: cancel the pending frame, disconnect observers, drop input
    /// subscriptions. Idempotent.
    fn dispose(&self) {
        let core = self.core();
        if core.disposed.replace(true) {
            return;
        }
        let cancelled = core.coalescer.cancel();
        self.release();
        // Take first so no borrow is held while subscriptions drop.
        let subscriptions = std::mem::take(&mut *core.subscriptions.borrow_mut());
        drop(subscriptions);
        debug!(engine = %core.id, kind = self.kind(), cancelled, "sizing engine disposed");
    }
}

/// Ask for a coalesced recompute on the next frame.
pub(crate) fn schedule<E: Engine + 'static>(engine: &Rc<E>) {
    let core = engine.core();
    if core.is_disposed() {
        return;
    }
    let weak = Rc::downgrade(engine);
    let request = core.coalescer.request(move |ticket| {
        if let Some(engine) = weak.upgrade() {
            run_frame(&*engine, ticket);
        }
    });
    core.bump(|s| {
        s.triggers += 1;
        match request {
            Request::Scheduled(_) => s.frames += 1,
            Request::Coalesced => s.coalesced += 1,
        }
    });
    match request {
        Request::Scheduled(token) => trace!(engine = %core.id, %token, "recompute scheduled"),
        Request::Coalesced => trace!(engine = %core.id, "recompute coalesced"),
    }
}

fn run_frame<E: Engine + ?Sized>(engine: &E, ticket: FrameTicket) {
    let core = engine.core();
    if !core.coalescer.claim(ticket) || core.is_disposed() {
        return;
    }
    let batch = engine.recompute();
    core.bump(|s| {
        s.recomputes += 1;
        s.degraded += batch.degraded as u64;
    });
    if core.config.trace_batches {
        debug!(
            engine = %core.id,
            kind = engine.kind(),
            cells = batch.cells,
            degraded = batch.degraded,
            "recompute batch published"
        );
    }
}

/// Size one cell, or say why it cannot be sized.
pub(crate) fn size_cell(
    handle: Option<&ElementHandle>,
    percents: Option<&[f64]>,
    unit: &str,
) -> Result<SizingResult, Degraded> {
    let handle = handle.ok_or(Degraded::NotMeasurable)?;
    let percents = percents
        .filter(|p| !p.is_empty())
        .ok_or(Degraded::InvalidSpec)?;
    let width = handle
        .measurable_width()
        .map(whole_pixels)
        .filter(|&px| px > 0)
        .ok_or(Degraded::NotMeasurable)?;
    Ok(SizingResult::from_allocation(
        width,
        allocate_with_unit(width, percents, unit),
    ))
}

/// Fractional widths are floored so the columns never overflow the cell.
pub(crate) fn whole_pixels(width: f64) -> u32 {
    let floored = width.floor();
    if floored <= 0.0 {
        0
    } else if floored >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        floored as u32
    }
}

/// Log a degraded cell and return the empty result.
pub(crate) fn degrade(engine: EngineId, key: Option<&str>, reason: Degraded) -> SizingResult {
    trace!(engine = %engine, key, %reason, "cell degraded to empty result");
    SizingResult::empty()
}
