//! Invalidation channel configuration.

use serde::{Deserialize, Serialize};

/// Settings for the in-process invalidation hub and its polling fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Buffer size of each broadcast channel. Lagged subscribers drop
    /// messages and are expected to fall back to polling.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Poll interval hint returned to clients watching a pending request.
    #[serde(default = "default_poll_interval")]
    pub suggested_poll_interval_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            suggested_poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_channel_buffer() -> usize {
    64
}

fn default_poll_interval() -> u64 {
    5
}
