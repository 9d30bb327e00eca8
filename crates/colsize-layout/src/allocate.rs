#![forbid(unsafe_code)]

//! Pixel allocator: floor every column but the last, give the last the
//! remainder.

use std::fmt::Write as _;

use crate::percent::normalize;

/// Length unit used by [`allocate`] when rendering the template.
pub const DEFAULT_UNIT: &str = "px";

/// Integer pixel widths for one container plus their rendered template.
///
/// `template` is always derived from `widths` via [`render_template`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnAllocation {
    pub widths: Vec<u32>,
    pub template: String,
}

impl ColumnAllocation {
    /// The "not yet measurable" allocation: no columns, empty template.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Sum of all column widths.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.widths.iter().map(|&w| u64::from(w)).sum()
    }
}

/// Allocate `container_width_px` across `percents`, rendering the template
/// in pixels.
///
/// Returns [`ColumnAllocation::empty`] when the width is zero or the vector
/// is empty. See [`allocate_with_unit`] for the rounding rules.
#[must_use]
pub fn allocate(container_width_px: u32, percents: &[f64]) -> ColumnAllocation {
    allocate_with_unit(container_width_px, percents, DEFAULT_UNIT)
}

/// Allocate `container_width_px` across `percents`, rendering the template
/// with `unit` appended to every width.
///
/// The vector is normalized first. Every column except the last gets
/// `floor(width * pct / 100)`, capped at what is still unallocated; the last
/// column gets the remainder. The widths therefore always sum to
/// `container_width_px` exactly, and reordering the input changes which
/// column absorbs the rounding loss.
#[must_use]
pub fn allocate_with_unit(container_width_px: u32, percents: &[f64], unit: &str) -> ColumnAllocation {
    if container_width_px == 0 || percents.is_empty() {
        return ColumnAllocation::empty();
    }

    let normalized = normalize(percents);
    let Some(leading_len) = normalized.len().checked_sub(1) else {
        return ColumnAllocation::empty();
    };

    let total = f64::from(container_width_px);
    let mut widths = Vec::with_capacity(normalized.len());
    let mut used: u32 = 0;
    for pct in &normalized[..leading_len] {
        let remaining = container_width_px - used;
        let width = floor_share(total, *pct, remaining);
        widths.push(width);
        used += width;
    }
    widths.push(container_width_px.saturating_sub(used));

    let template = render_template(&widths, unit);
    ColumnAllocation { widths, template }
}

/// `floor(total * pct / 100)`, clamped into `0..=cap`.
#[inline]
fn floor_share(total: f64, pct: f64, cap: u32) -> u32 {
    let share = (total * pct / 100.0).floor();
    if share.is_nan() || share <= 0.0 {
        0
    } else if share >= f64::from(cap) {
        cap
    } else {
        // In range (0, cap), so the cast is exact.
        share as u32
    }
}

/// Render widths as `"{w}{unit}"` separated by single spaces.
#[must_use]
pub fn render_template(widths: &[u32], unit: &str) -> String {
    let mut out = String::with_capacity(widths.len() * (unit.len() + 5));
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing to a String cannot fail.
        let _ = write!(out, "{width}{unit}");
    }
    out
}
