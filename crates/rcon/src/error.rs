//! Error types for the RCON network path

use std::time::Duration;

use crate::session::SessionState;

/// Error type for packet encoding and decoding
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Body cannot be put on the wire (embedded null, oversized)
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Size field is out of range or the peer closed mid-frame
    #[error("Framing error: {0}")]
    Framing(String),

    /// Frame was complete but its contents are malformed
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Peer closed the connection cleanly between frames
    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// Underlying stream failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Why a multi-packet response never reached its boundary marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompleteCause {
    /// Server closed the connection before echoing the probe
    ConnectionClosed,
    /// The operation deadline expired before the probe echo arrived
    DeadlineExceeded,
}

impl std::fmt::Display for IncompleteCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionClosed => f.write_str("connection closed"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Error type for RCON session operations
#[derive(Debug, thiserror::Error)]
pub enum RconError {
    /// TCP connection could not be established
    #[error("Failed to connect to {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Server rejected the password
    #[error("Authentication failed: server rejected the RCON password")]
    Auth,

    /// Malformed frame on the wire
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Operation issued in the wrong session state
    #[error("Session is not ready (state: {0})")]
    NotReady(SessionState),

    /// Response reassembly did not reach the probe echo
    #[error("Incomplete response after {packets} packet(s): {cause}")]
    IncompleteResponse { packets: usize, cause: IncompleteCause },

    /// Overall operation deadline exceeded
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Write to an established connection failed
    #[error("Transport error: {0}")]
    Transport(#[source] std::io::Error),
}

/// Result type for RCON operations
pub type RconResult<T> = Result<T, RconError>;

impl RconError {
    /// Returns true for malformed-frame and reassembly failures
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Codec(_) | Self::IncompleteResponse { .. })
    }
}
