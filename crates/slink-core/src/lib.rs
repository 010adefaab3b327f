//! # Slink Core
//!
//! Core library for slink - short links whose target or content is
//! encrypted under a human-typeable key and stored as a git commit message.
//!
//! This crate provides the envelope format, the patch-text parser, the
//! resolution engine and the record stores, independent of any CLI or HTTP
//! server.
//!
//! ## Architecture
//!
//! - **crypto**: PBKDF2 key derivation and the AES-GCM envelope cipher
//! - **envelope**: Versioned single-line JSON encoding of a sealed payload
//! - **patch**: Locating the directive line in `git format-patch` text
//! - **identifier**: Validated short identifiers
//! - **storage**: `RecordStore` trait and the GitHub / directory / memory backends
//! - **resolve**: Fetch, parse, decrypt and classify
//! - **api**: Framework-agnostic request handlers
//! - **config**: Explicit process configuration

pub mod api;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod fs;
pub mod identifier;
pub mod patch;
pub mod resolve;
pub mod storage;

pub use api::{Api, ApiResponse, CreateRequest, RequestContext};
pub use config::SlinkConfig;
pub use envelope::Envelope;
pub use error::{Result, SlinkError};
pub use identifier::ShortId;
pub use patch::ParsedDirective;
pub use resolve::{CreatedLink, Outcome, Resolver};
pub use storage::RecordStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
