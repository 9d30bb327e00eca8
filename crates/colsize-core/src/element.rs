#![forbid(unsafe_code)]

//! Measurable elements and identity-compared handles.
//!
//! # Invariants
//!
//! 1. Two [`ElementHandle`]s are equal iff they refer to the same element
//!    identity ([`ElementId`]), regardless of the element's current size.
//! 2. An element that is not attached to its document is never measurable,
//!    whatever width it last reported.

use std::fmt;
use std::rc::Rc;

/// Stable identity of an element within its host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// A rendered surface whose content-box width can be measured.
pub trait Element {
    /// Identity of this element. Must not change over its lifetime.
    fn id(&self) -> ElementId;

    /// Whether the element is currently attached to the rendered tree.
    fn is_attached(&self) -> bool;

    /// Current rendered content-box width in CSS pixels.
    ///
    /// May be fractional. Detached or collapsed elements report `0.0`.
    fn content_width(&self) -> f64;
}

/// Shared handle to an [`Element`], compared by identity.
///
/// Cloning a handle is cheap and yields a handle to the **same** element.
#[derive(Clone)]
pub struct ElementHandle {
    inner: Rc<dyn Element>,
}

impl ElementHandle {
    /// Wrap a shared element.
    #[must_use]
    pub fn new(element: Rc<dyn Element>) -> Self {
        Self { inner: element }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.inner.id()
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.is_attached()
    }

    /// Measured width, or `None` when the element cannot be measured right
    /// now (detached, zero/negative, or non-finite width).
    #[must_use]
    pub fn measurable_width(&self) -> Option<f64> {
        if !self.inner.is_attached() {
            return None;
        }
        let width = self.inner.content_width();
        (width.is_finite() && width > 0.0).then_some(width)
    }

    /// Raw measured width; `0.0` when detached or non-finite.
    #[must_use]
    pub fn width_or_zero(&self) -> f64 {
        self.measurable_width().unwrap_or(0.0)
    }
}

impl<E: Element + 'static> From<Rc<E>> for ElementHandle {
    fn from(element: Rc<E>) -> Self {
        Self { inner: element }
    }
}

impl PartialEq for ElementHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ElementHandle {}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("id", &self.id())
            .field("attached", &self.is_attached())
            .finish()
    }
}
