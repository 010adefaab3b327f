//! Application-level utilities for the slink CLI.
//!
//! This module provides:
//! - Config path resolution and missing-config messages
//! - The per-invocation context handed to every command

mod context;
mod paths;

pub use context::AppContext;
