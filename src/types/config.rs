//! Configuration structures.
//!
//! Defaults mirror the numbers the remote endpoint contract was built around:
//! 3 attempts with a 1 second gap, a 30 second refresh period, and the
//! well-known local endpoint port.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Global relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote endpoint configuration.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// HTTP retry policy.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Background tool-list refresh.
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Durable tool-list cache.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Stdio transport limits.
    #[serde(default)]
    pub stdio: StdioConfig,
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL the JSON-RPC envelopes are POSTed to.
    pub base_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:60100".to_string(),
        }
    }
}

/// HTTP retry policy.
///
/// Fixed-delay, no jitter, no backoff. Deliberately naive; the remote
/// endpoint is a single local process, not a fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per logical call.
    pub max_attempts: u32,

    /// Fixed wait between attempts after the first.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            interval: Duration::from_millis(1000),
        }
    }
}

/// Background tool-list refresh configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Period between refresh cycles.
    #[serde(with = "humantime_serde")]
    pub period: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(30),
        }
    }
}

/// Durable tool-list cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Override for the cache directory. When unset, the per-user cache
    /// directory is used (`~/.cache` on Linux, platform equivalent elsewhere).
    pub dir: Option<PathBuf>,
}

/// Stdio transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdioConfig {
    /// Maximum accepted inbound line length in bytes. Longer lines are
    /// rejected with a JSON-RPC error without ever being buffered whole.
    pub max_line_bytes: usize,

    /// Bounded channel capacity between dispatch tasks and the stdout
    /// writer task.
    pub response_channel_capacity: usize,
}

impl Default for StdioConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: 5 * 1024 * 1024,
            response_channel_capacity: 64,
        }
    }
}
