//! Session tuning

use std::time::Duration;

use cvardump_sdk::DEFAULT_MAX_PACKET_SIZE;

/// Default TCP connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default budget for connect + authenticate + execute
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeouts and limits for one RCON session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RconConfig {
    /// Bound on establishing the TCP connection
    pub connect_timeout: Duration,
    /// Bound on the whole connect/auth/execute sequence
    pub operation_timeout: Duration,
    /// Largest size field accepted from the server
    pub max_packet_size: usize,
}

impl Default for RconConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }
}
