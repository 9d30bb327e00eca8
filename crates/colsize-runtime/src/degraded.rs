#![forbid(unsafe_code)]

//! Reasons a cell publishes the empty result.
//!
//! These never reach callers as errors: a degraded cell simply publishes
//! [`SizingResult::empty`](colsize_layout::SizingResult::empty). They exist
//! for trace events and [`EngineStats`](crate::EngineStats).

/// Why a cell could not be sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degraded {
    /// No handle, a detached element, or a width below one pixel.
    NotMeasurable,
    /// Percent vector missing or empty.
    InvalidSpec,
}

impl std::fmt::Display for Degraded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotMeasurable => write!(f, "element not measurable"),
            Self::InvalidSpec => write!(f, "invalid column percentages"),
        }
    }
}

impl std::error::Error for Degraded {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Degraded::NotMeasurable.to_string(), "element not measurable");
        assert_eq!(Degraded::InvalidSpec.to_string(), "invalid column percentages");
    }
}
