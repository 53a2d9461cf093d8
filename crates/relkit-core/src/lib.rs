#![forbid(unsafe_code)]
//! relkit-core library.
//!
//! Pure relation remaps ([`remap`]), value-wise mapping ([`mapping`]), the
//! re-armable [`FutureCell`] and the cache-on-first-read [`Memo`].
//!
//! # Conventions
//!
//! - **Errors**: one `thiserror` enum per module, each mapped to an
//!   [`ErrorCode`].
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`); no subscriber is
//!   installed here.

pub mod error;
pub mod future;
pub mod mapping;
pub mod memo;
pub mod remap;

pub use error::ErrorCode;
pub use future::FutureCell;
pub use mapping::{collect_mapped, map_values};
pub use memo::Memo;
pub use remap::{
    GroupedList, Mapping, NestedMapping, RemapError, Triple, group_by_inner_key, invert,
    pivot_nested, to_set,
};
