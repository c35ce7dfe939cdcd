//! RCON packet type definitions
//!
//! The Source RCON protocol reuses type codes across directions: code `2` is
//! `SERVERDATA_EXECCOMMAND` when sent by the client and
//! `SERVERDATA_AUTH_RESPONSE` when sent by the server. A code can therefore
//! only be resolved together with the direction of the frame.

/// `SERVERDATA_AUTH` (client -> server)
pub const SERVERDATA_AUTH: i32 = 3;

/// `SERVERDATA_AUTH_RESPONSE` (server -> client)
pub const SERVERDATA_AUTH_RESPONSE: i32 = 2;

/// `SERVERDATA_EXECCOMMAND` (client -> server)
pub const SERVERDATA_EXECCOMMAND: i32 = 2;

/// `SERVERDATA_RESPONSE_VALUE` (both directions)
///
/// Servers mirror an empty `RESPONSE_VALUE` back to the client unchanged,
/// which is what makes it usable as a response boundary probe.
pub const SERVERDATA_RESPONSE_VALUE: i32 = 0;

/// Request id the server returns in `AUTH_RESPONSE` when the password is wrong
pub const AUTH_FAILURE_ID: i32 = -1;

/// Which side of the connection emitted a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Sent by the RCON client
    ClientToServer,
    /// Sent by the game server
    ServerToClient,
}

/// Packet type
///
/// Maps to the `SERVERDATA_*` constants of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    Auth,
    AuthResponse,
    ExecCommand,
    ResponseValue,
}

impl PacketKind {
    /// Wire type code for this packet kind
    pub const fn code(&self) -> i32 {
        match self {
            Self::Auth => SERVERDATA_AUTH,
            Self::AuthResponse => SERVERDATA_AUTH_RESPONSE,
            Self::ExecCommand => SERVERDATA_EXECCOMMAND,
            Self::ResponseValue => SERVERDATA_RESPONSE_VALUE,
        }
    }

    /// Resolve a wire type code received in the given direction
    ///
    /// Returns None for codes the engine never sends in that direction.
    pub const fn from_code(code: i32, direction: Direction) -> Option<Self> {
        match (direction, code) {
            (Direction::ClientToServer, SERVERDATA_AUTH) => Some(Self::Auth),
            (Direction::ClientToServer, SERVERDATA_EXECCOMMAND) => Some(Self::ExecCommand),
            (Direction::ClientToServer, SERVERDATA_RESPONSE_VALUE) => Some(Self::ResponseValue),
            (Direction::ServerToClient, SERVERDATA_AUTH_RESPONSE) => Some(Self::AuthResponse),
            (Direction::ServerToClient, SERVERDATA_RESPONSE_VALUE) => Some(Self::ResponseValue),
            _ => None,
        }
    }

    /// Direction this kind travels in, if it is one-way
    pub const fn direction(&self) -> Option<Direction> {
        match self {
            Self::Auth | Self::ExecCommand => Some(Direction::ClientToServer),
            Self::AuthResponse => Some(Direction::ServerToClient),
            Self::ResponseValue => None,
        }
    }
}

impl std::fmt::Display for PacketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auth => "SERVERDATA_AUTH",
            Self::AuthResponse => "SERVERDATA_AUTH_RESPONSE",
            Self::ExecCommand => "SERVERDATA_EXECCOMMAND",
            Self::ResponseValue => "SERVERDATA_RESPONSE_VALUE",
        };
        f.write_str(name)
    }
}
