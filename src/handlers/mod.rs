//! Chat command handlers.
//!
//! This module contains the Handler trait and the registry that dispatches
//! `!commands` parsed out of channel messages.
//!
//! ## Zero-Copy Architecture
//!
//! Handlers receive `BotCommand<'_>`, which borrows directly from the line
//! read off the socket. Use `cmd.arg(n)` to access arguments as `&str`
//! slices.

mod builtin;
pub mod core;
mod custom;

pub use self::core::{Context, Handler, Registry, Shared};
