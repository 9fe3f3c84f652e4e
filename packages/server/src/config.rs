//! Connection timing and buffer settings.

use std::time::Duration;

/// Default read-side liveness deadline.
pub const DEFAULT_PONG_WAIT: Duration = Duration::from_secs(60);
/// Default bound on a single write to the socket.
pub const DEFAULT_WRITE_WAIT: Duration = Duration::from_secs(10);
/// Default maximum inbound text frame size in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 512;
/// Default per-connection outbound buffer capacity.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Heartbeat and buffering settings applied to every connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Read deadline, refreshed by every inbound frame.
    pub pong_wait: Duration,
    /// Bound on each outbound write.
    pub write_wait: Duration,
    /// Interval between server pings; always shorter than `pong_wait`.
    pub ping_period: Duration,
    pub max_message_size: usize,
    pub outbound_capacity: usize,
}

impl HeartbeatConfig {
    /// Build a config whose ping period is 9/10 of `pong_wait`.
    pub fn new(pong_wait: Duration, write_wait: Duration) -> Self {
        Self {
            pong_wait,
            write_wait,
            ping_period: pong_wait - pong_wait / 10,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }

    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    pub fn with_outbound_capacity(mut self, outbound_capacity: usize) -> Self {
        self.outbound_capacity = outbound_capacity;
        self
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PONG_WAIT, DEFAULT_WRITE_WAIT)
    }
}
