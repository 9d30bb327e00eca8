#![forbid(unsafe_code)]

//! Percentage normalization and exact pixel allocation.
//!
//! Two pure functions carry the whole numeric contract:
//!
//! - [`normalize`]: turn an arbitrary numeric vector into a percentage
//!   distribution summing to 100.
//! - [`allocate`]: turn a container width and a percentage vector into an
//!   integer pixel partition that sums to the container width exactly.
//!
//! # Invariants
//!
//! 1. For every non-empty input, `normalize(v).iter().sum()` is 100 within
//!    [`SUM_TOLERANCE`].
//! 2. For `width > 0` and a non-empty vector, the widths returned by
//!    [`allocate`] sum to `width` with integer equality.
//! 3. Rounding loss always lands on the **last** column.
//! 4. Both functions are deterministic: identical inputs give bit-identical
//!    outputs.
//!
//! # Example
//!
//! ```
//! use colsize_layout::allocate;
//!
//! let columns = allocate(10, &[33.0, 33.0, 34.0]);
//! assert_eq!(columns.widths, vec![3, 3, 4]);
//! assert_eq!(columns.template, "3px 3px 4px");
//! ```

pub mod allocate;
pub mod percent;
pub mod result;

pub use allocate::{ColumnAllocation, DEFAULT_UNIT, allocate, allocate_with_unit, render_template};
pub use percent::{SUM_TOLERANCE, normalize};
pub use result::SizingResult;
