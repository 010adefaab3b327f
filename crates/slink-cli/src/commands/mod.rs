//! Command handlers, one module per area.

pub mod init;
pub mod links;
pub mod misc;
