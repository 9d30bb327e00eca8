#![forbid(unsafe_code)]

//! Engine configuration.

use colsize_layout::DEFAULT_UNIT;

/// Configuration shared by every engine created in one
/// [`SizingScope`](crate::SizingScope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizingConfig {
    /// Length unit appended to each width in the column template.
    /// Default: `"px"`.
    pub template_unit: String,

    /// Emit a `debug` event for every recompute batch.
    /// Default: true.
    pub trace_batches: bool,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            template_unit: DEFAULT_UNIT.to_string(),
            trace_batches: true,
        }
    }
}

impl SizingConfig {
    #[must_use]
    pub fn with_template_unit(mut self, unit: impl Into<String>) -> Self {
        self.template_unit = unit.into();
        self
    }

    #[must_use]
    pub fn with_trace_batches(mut self, enabled: bool) -> Self {
        self.trace_batches = enabled;
        self
    }
}
