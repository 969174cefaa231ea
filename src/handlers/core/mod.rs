//! Core handler infrastructure: the per-message context, the `Handler`
//! trait, and the registry that dispatches to it.

pub mod context;
pub mod registry;

pub use context::{Context, Handler, Shared};
pub use registry::Registry;
