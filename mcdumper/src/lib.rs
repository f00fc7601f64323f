//! mcdumper - incremental mirror for Minecraft release artifacts
//!
//! This library mirrors two remote catalogs into a local directory tree:
//! client/server jars from the launcher version catalog and MCP mapping
//! archives. Each run diffs the remote catalog against a local manifest,
//! downloads only what is missing and records completed versions, so runs
//! are idempotent and resumable.
//!
//! The engine in [`mirror`] is generic over [`source::ArtifactSource`]; the
//! two concrete sources live in [`source::java`] and [`source::mcp`].

pub mod config;
pub mod diff;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod manifest;
pub mod mirror;
pub mod source;

pub use error::{DumperError, DumperResult};
