//! Catalog cache configuration.

use serde::{Deserialize, Serialize};

/// Read-through catalog cache configuration.
///
/// The cache is optional; when disabled the engine resolves every
/// capability directly against the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether the catalog cache is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum number of cached capability entries.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// TTL for cached entries in seconds.
    #[serde(default = "default_ttl")]
    pub time_to_live_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_capacity: default_max_capacity(),
            time_to_live_seconds: default_ttl(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_capacity() -> u64 {
    10000
}

fn default_ttl() -> u64 {
    300
}
