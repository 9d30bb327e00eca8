#![forbid(unsafe_code)]

//! Runtime: reactive, frame-coalesced column sizing engines.
//!
//! Engines live in a [`SizingScope`] built over a [`colsize_core::Host`].
//! They watch element sizes through the host's observer port, batch every
//! trigger into at most one recompute per frame, and publish results through
//! an [`Observable`].
//!
//! - [`ColumnSizing`]: one element, one percent vector.
//! - [`ColumnSizingMulti`]: keyed elements and percent vectors, one shared
//!   observer, one atomic map per frame.
//! - [`CellWidths`]: keyed elements, raw measured widths.

pub mod coalescer;
pub mod config;
pub mod degraded;
pub mod reactive;
pub mod scope;
pub mod sizing;
pub mod stats;

pub use coalescer::{FrameCoalescer, FrameTicket, Request};
pub use config::SizingConfig;
pub use degraded::Degraded;
pub use reactive::{Observable, Subscription};
pub use scope::{EngineId, SizingScope};
pub use sizing::{
    CellWidths, ColumnSizing, ColumnSizingMulti, HandleMap, PercentMap, ResultMap, WidthMap,
};
pub use stats::EngineStats;
