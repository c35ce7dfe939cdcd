//! cvardump RCON - Source Engine Remote Console Client
//!
//! This crate handles:
//! - Framing and deframing RCON packets ([`codec`])
//! - Owning the TCP connection behind a testable [`Transport`] seam
//! - Authentication and multi-packet command responses ([`session`])
//!
//! # Architecture
//!
//! A [`Session`] is created by [`Session::connect`], authenticated once and
//! then used to execute commands. All blocking IO is bounded by a single
//! [`Deadline`] started at connect time. Nothing is retried; every failure
//! closes the session and is returned to the caller.
//!
//! ```ignore
//! use cvardump_rcon::{RconConfig, Session};
//!
//! let mut session = Session::connect("192.168.1.100:27015", &RconConfig::default())?;
//! session.authenticate("hunter2")?;
//! let text = session.execute_command("cvarlist")?;
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod session;
pub mod transport;

pub use codec::{Packet, PacketCodec};
pub use config::RconConfig;
pub use error::{CodecError, CodecResult, IncompleteCause, RconError, RconResult};
pub use session::{Session, SessionState};
pub use transport::{Bounded, Deadline, Transport};

// Re-export SDK crate
pub use cvardump_sdk as sdk;
