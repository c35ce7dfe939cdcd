//! Exit codes for the cvardump CLI

use cvardump_core::rcon::RconError;
use cvardump_core::DumpError;

use crate::commands::CommandError;

/// Exit code constants
pub mod codes {
    /// Successful execution
    pub const SUCCESS: i32 = 0;
    /// Invalid arguments or config
    pub const INVALID_ARGS: i32 = 1;
    /// Manual input could not be read
    pub const INPUT_ERROR: i32 = 2;
    /// Server unreachable, refused or timed out
    pub const CONNECTION_ERROR: i32 = 3;
    /// RCON password rejected
    pub const AUTH_ERROR: i32 = 4;
    /// Malformed or incomplete RCON response
    pub const PROTOCOL_ERROR: i32 = 5;
    /// CSV could not be written
    pub const EXPORT_ERROR: i32 = 6;
}

/// Map a CommandError to an exit code
pub fn exit_code(error: &CommandError) -> i32 {
    match error {
        CommandError::Config(_) => codes::INVALID_ARGS,
        CommandError::Dump(DumpError::Input { .. }) => codes::INPUT_ERROR,
        CommandError::Dump(DumpError::Export(_)) => codes::EXPORT_ERROR,
        CommandError::Dump(DumpError::Rcon(rcon)) => match rcon {
            RconError::Auth => codes::AUTH_ERROR,
            RconError::Connection { .. } | RconError::Timeout(_) | RconError::Transport(_) => {
                codes::CONNECTION_ERROR
            }
            RconError::Codec(_) | RconError::IncompleteResponse { .. } | RconError::NotReady(_) => {
                codes::PROTOCOL_ERROR
            }
        },
    }
}
