//! RCON session - authenticated connection and command execution
//!
//! # Lifecycle
//!
//! ```text
//! connect ──> Authenticating ──auth ok──> Ready <──> Executing
//!                   │                       │           │
//!                   └──auth failure──> Closed <─────────┘ (on any error)
//! ```
//!
//! # Response reassembly
//!
//! The engine splits long replies over several `RESPONSE_VALUE` packets and
//! never says how many. After each command the session sends an empty
//! `RESPONSE_VALUE` probe with its own request id. The server mirrors it back
//! once it has answered the command, so every packet that carries the
//! command's id and arrives before the mirrored probe belongs to the reply.

use std::io::{ErrorKind, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use cvardump_sdk::{PacketKind, AUTH_FAILURE_ID};
use tracing::{debug, info, trace, warn};

use crate::codec::{Packet, PacketCodec};
use crate::config::RconConfig;
use crate::error::{CodecError, IncompleteCause, RconError, RconResult};
use crate::transport::{is_timeout, Bounded, Deadline, Transport};

/// Session state
///
/// A session value only exists once its connection is open, so the
/// disconnected and connecting phases live inside [`Session::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, waiting for a successful `authenticate`
    Authenticating,
    /// Authenticated and idle
    Ready,
    /// A command is in flight
    Executing,
    /// Connection released, terminal
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Authenticating => "authenticating",
            Self::Ready => "ready",
            Self::Executing => "executing",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// One authenticated RCON connection
///
/// Owns its transport exclusively. The transport is shut down on
/// [`close`](Session::close), on any failed operation, and on drop.
pub struct Session<T: Transport = TcpStream> {
    transport: Option<T>,
    state: SessionState,
    next_request_id: i32,
    codec: PacketCodec,
    deadline: Deadline,
    peer: String,
}

impl Session<TcpStream> {
    /// Open a TCP connection to `address` (`host:port`)
    ///
    /// Starts the operation deadline that also bounds the later
    /// authenticate and execute calls.
    #[tracing::instrument(skip(config))]
    pub fn connect(address: &str, config: &RconConfig) -> RconResult<Self> {
        let deadline = Deadline::after(config.operation_timeout);
        let connection_error = |source| RconError::Connection {
            address: address.to_string(),
            source,
        };

        let addrs: Vec<SocketAddr> = address
            .to_socket_addrs()
            .map_err(connection_error)?
            .collect();

        let mut last_error = None;
        for addr in addrs {
            let Some(left) = deadline.remaining() else {
                return Err(RconError::Timeout(deadline.elapsed()));
            };
            let timeout = config.connect_timeout.min(left);

            debug!("Connecting to {} (timeout {:?})", addr, timeout);
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        debug!("Failed to set TCP_NODELAY: {}", e);
                    }
                    info!("Connected to {}", addr);
                    return Ok(Self::from_parts(stream, address.to_string(), config, deadline));
                }
                Err(e) => {
                    debug!("Connection to {} failed: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }

        Err(connection_error(last_error.unwrap_or_else(|| {
            std::io::Error::new(ErrorKind::NotFound, "address did not resolve")
        })))
    }
}

impl<T: Transport> Session<T> {
    /// Wrap an already connected transport
    ///
    /// The operation deadline starts now.
    pub fn with_transport(transport: T, peer: impl Into<String>, config: &RconConfig) -> Self {
        let deadline = Deadline::after(config.operation_timeout);
        Self::from_parts(transport, peer.into(), config, deadline)
    }

    fn from_parts(transport: T, peer: String, config: &RconConfig, deadline: Deadline) -> Self {
        Self {
            transport: Some(transport),
            state: SessionState::Authenticating,
            next_request_id: 1,
            codec: PacketCodec::client().with_max_packet_size(config.max_packet_size),
            deadline,
            peer,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true once the server accepted the password
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Ready | SessionState::Executing)
    }

    /// Address this session was opened against
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Authenticate with the RCON password
    ///
    /// A rejected password closes the session; there is no retry.
    #[tracing::instrument(skip_all, fields(peer = %self.peer))]
    pub fn authenticate(&mut self, password: &str) -> RconResult<()> {
        if self.state != SessionState::Authenticating {
            return Err(RconError::NotReady(self.state));
        }

        let request_id = self.allocate_request_id();
        match self.exchange_auth(request_id, password) {
            Ok(()) => {
                self.state = SessionState::Ready;
                info!("Authenticated with {}", self.peer);
                Ok(())
            }
            Err(e) => {
                warn!("Authentication with {} failed: {}", self.peer, e);
                self.close();
                Err(e)
            }
        }
    }

    /// Execute a console command and return its complete output
    ///
    /// Any failure closes the session. Partial output is never returned.
    #[tracing::instrument(skip(self), fields(peer = %self.peer))]
    pub fn execute_command(&mut self, command: &str) -> RconResult<String> {
        if self.state != SessionState::Ready {
            return Err(RconError::NotReady(self.state));
        }

        self.state = SessionState::Executing;
        match self.exchange_command(command) {
            Ok(text) => {
                self.state = SessionState::Ready;
                Ok(text)
            }
            Err(e) => {
                warn!("Command '{}' failed: {}", command, e);
                self.close();
                Err(e)
            }
        }
    }

    /// Release the connection
    ///
    /// Idempotent. The session is unusable afterwards.
    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.shutdown() {
                debug!("Shutdown of {} failed: {}", self.peer, e);
            }
            debug!("Closed session to {}", self.peer);
        }
        self.state = SessionState::Closed;
    }

    fn exchange_auth(&mut self, request_id: i32, password: &str) -> RconResult<()> {
        self.send(request_id, PacketKind::Auth, password.as_bytes())?;

        // The engine sends an empty RESPONSE_VALUE ahead of the AUTH_RESPONSE
        loop {
            let packet = self.receive()?;
            match packet.kind {
                PacketKind::AuthResponse if packet.request_id == AUTH_FAILURE_ID => {
                    return Err(RconError::Auth)
                }
                PacketKind::AuthResponse if packet.request_id == request_id => return Ok(()),
                PacketKind::AuthResponse => {
                    return Err(CodecError::Consistency(format!(
                        "auth response for request id {} (expected {})",
                        packet.request_id, request_id
                    ))
                    .into())
                }
                _ => trace!(
                    "Discarding {} ({} bytes) ahead of auth response",
                    packet.kind,
                    packet.body.len()
                ),
            }
        }
    }

    fn exchange_command(&mut self, command: &str) -> RconResult<String> {
        let command_id = self.allocate_request_id();
        let probe_id = self.allocate_request_id();

        self.send(command_id, PacketKind::ExecCommand, command.as_bytes())?;
        self.send(probe_id, PacketKind::ResponseValue, &[])?;

        let mut response = Vec::new();
        let mut packets = 0;
        loop {
            let packet = match self.receive() {
                Ok(packet) => packet,
                Err(RconError::Codec(CodecError::ConnectionClosed)) => {
                    return Err(RconError::IncompleteResponse {
                        packets,
                        cause: IncompleteCause::ConnectionClosed,
                    })
                }
                Err(RconError::Timeout(_)) => {
                    return Err(RconError::IncompleteResponse {
                        packets,
                        cause: IncompleteCause::DeadlineExceeded,
                    })
                }
                Err(e) => return Err(e),
            };

            if packet.request_id == probe_id {
                debug!(packets, bytes = response.len(), "Reached response boundary");
                break;
            }

            if packet.request_id == command_id && packet.kind == PacketKind::ResponseValue {
                trace!("Response packet {} ({} bytes)", packets + 1, packet.body.len());
                response.extend_from_slice(&packet.body);
                packets += 1;
            } else {
                // Includes the engine's trailing packet after a previous probe mirror
                debug!(
                    "Skipping stale {} with request id {}",
                    packet.kind, packet.request_id
                );
            }
        }

        // Joined as bytes so characters split across packets decode intact
        Ok(String::from_utf8_lossy(&response).into_owned())
    }

    fn allocate_request_id(&mut self) -> i32 {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        if self.next_request_id == AUTH_FAILURE_ID {
            self.next_request_id = 1;
        }
        id
    }

    fn transport(&mut self) -> RconResult<&mut T> {
        let state = self.state;
        self.transport.as_mut().ok_or(RconError::NotReady(state))
    }

    fn send(&mut self, request_id: i32, kind: PacketKind, body: &[u8]) -> RconResult<()> {
        let frame = self.codec.encode(request_id, kind, body)?;

        let deadline = self.deadline;
        let mut stream = Bounded::new(self.transport()?, deadline);
        stream
            .write_all(&frame)
            .and_then(|()| stream.flush())
            .map_err(|e| {
                if is_timeout(&e) {
                    RconError::Timeout(deadline.elapsed())
                } else {
                    RconError::Transport(e)
                }
            })?;

        debug!(request_id, %kind, bytes = body.len(), "Sent packet");
        Ok(())
    }

    fn receive(&mut self) -> RconResult<Packet> {
        let deadline = self.deadline;
        let codec = self.codec;
        let mut stream = Bounded::new(self.transport()?, deadline);
        let packet = codec.decode(&mut stream).map_err(|e| match e {
            CodecError::Io(io) if is_timeout(&io) => RconError::Timeout(deadline.elapsed()),
            other => RconError::Codec(other),
        })?;

        debug!(
            request_id = packet.request_id,
            kind = %packet.kind,
            bytes = packet.body.len(),
            "Received packet"
        );
        Ok(packet)
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Transport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("peer", &self.peer)
            .field("state", &self.state)
            .field("next_request_id", &self.next_request_id)
            .finish()
    }
}
