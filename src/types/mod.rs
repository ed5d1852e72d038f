//! Core types for the relay.
//!
//! This module provides foundational types used throughout the system:
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for endpoint, retry, refresh, and cache

mod config;
mod errors;

pub use config::{CacheConfig, Config, EndpointConfig, RefreshConfig, RetryConfig, StdioConfig};
pub use errors::{Error, Result};
