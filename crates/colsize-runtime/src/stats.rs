#![forbid(unsafe_code)]

//! Per-engine counters.

/// Counters describing how much work an engine did.
///
/// `triggers == frames + coalesced` for as long as the engine is live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Size notifications and input changes that asked for a recompute.
    pub triggers: u64,
    /// Triggers absorbed by an already pending frame.
    pub coalesced: u64,
    /// Frames actually scheduled.
    pub frames: u64,
    /// Recompute passes run.
    pub recomputes: u64,
    /// Cells published as empty because they could not be sized.
    pub degraded: u64,
}
