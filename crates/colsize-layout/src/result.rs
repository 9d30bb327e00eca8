#![forbid(unsafe_code)]

//! Published sizing result.

use crate::allocate::ColumnAllocation;

/// Measured container width plus its column allocation.
///
/// The empty result `{0, "", []}` doubles as the "not measurable" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizingResult {
    /// Container width the widths were allocated from, in whole pixels.
    pub container_width_px: u32,
    /// `widths` rendered as a column template, e.g. `"120px 80px"`.
    pub template: String,
    pub widths: Vec<u32>,
}

impl SizingResult {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pair an allocation with the width it was computed from.
    ///
    /// An empty allocation always yields [`SizingResult::empty`], so a
    /// published result never reports a width without columns.
    #[must_use]
    pub fn from_allocation(container_width_px: u32, allocation: ColumnAllocation) -> Self {
        if allocation.is_empty() {
            return Self::empty();
        }
        Self {
            container_width_px,
            template: allocation.template,
            widths: allocation.widths,
        }
    }

    /// Whether this result carries a real allocation.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        !self.widths.is_empty()
    }
}
