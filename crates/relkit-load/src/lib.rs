#![forbid(unsafe_code)]
//! relkit-load library.
//!
//! Concurrent batch loading over an injected [`Loader`] or
//! [`CallbackLoader`], with an optional `ureq`-backed [`HttpLoader`]
//! (feature `http`).
//!
//! # Conventions
//!
//! - **Errors**: fetch failures pass through unchanged; config errors use
//!   `anyhow::Result` with file context.
//! - **Logging**: Use `tracing` macros (`debug!`, `warn!`, `trace!`).

pub mod batch;
pub mod config;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod loader;
pub mod payload;

pub use batch::{BatchOutcome, Loaded, Resources, load_all, load_all_into};
pub use config::{LoaderConfig, load_config, resolve_config};
pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::HttpLoader;
pub use loader::{CallbackLoader, Completion, Loader};
pub use payload::{LoadOptions, Payload, ResponseType};
