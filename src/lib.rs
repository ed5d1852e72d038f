//! # MCP Relay - Stdio-to-HTTP Tool Relay
//!
//! Bridges a local MCP client speaking newline-delimited JSON-RPC over stdio
//! to a remote tool endpoint reached over HTTP:
//! - Request forwarding with bounded fixed-delay retry
//! - Durable per-user tool-list cache used as the `tools/list` fallback
//! - Schema normalization to the JSON Schema 2020-12 dialect
//! - Background refresh loop with change notification to the endpoint
//!
//! ## Architecture
//!
//! ```text
//!   stdin/stdout ──► StdioServer ──► Relay ──► RelayClient ──► HTTP endpoint
//!                                     │
//!                               ToolCache (disk)
//!                                     ▲
//!                              refresh loop (30s)
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod cache;
pub mod client;
pub mod protocol;
pub mod relay;
pub mod schema;
pub mod seed;
pub mod stdio;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
