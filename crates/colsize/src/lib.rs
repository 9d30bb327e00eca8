#![forbid(unsafe_code)]

//! colsize public facade crate.
//!
//! Re-exports the pure allocation functions at the root and the sizing
//! engines behind the default `runtime` feature.

pub use colsize_core::{Element, ElementHandle, ElementId, Host};
pub use colsize_layout::{SizingResult, allocate, normalize};

#[cfg(feature = "runtime")]
pub use colsize_runtime::{
    CellWidths, ColumnSizing, ColumnSizingMulti, HandleMap, Observable, SizingConfig, SizingScope,
};

pub mod prelude {
    pub use colsize_core as core;
    pub use colsize_layout as layout;
    #[cfg(feature = "runtime")]
    pub use colsize_runtime as runtime;
}
