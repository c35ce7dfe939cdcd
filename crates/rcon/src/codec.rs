//! Packet codec - framing for the Source RCON wire format
//!
//! Pure framing logic. The codec never retries; a short read or a
//! malformed frame is reported to the caller as-is.

use std::borrow::Cow;
use std::io::{ErrorKind, Read};

use cvardump_sdk::{
    packet_size, Direction, PacketKind, DEFAULT_MAX_PACKET_SIZE, HEADER_LEN, MIN_PACKET_SIZE,
    SIZE_FIELD_LEN, TERMINATOR_LEN,
};

use crate::error::{CodecError, CodecResult};

/// A single decoded wire frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Declared payload length (excludes the size field itself)
    pub size: i32,
    /// Correlation id chosen by the client
    pub request_id: i32,
    /// Packet type
    pub kind: PacketKind,
    /// Body without its terminators
    pub body: Vec<u8>,
}

impl Packet {
    /// Body as text, replacing invalid UTF-8
    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns true if the body is empty
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Encoder/decoder for one side of a connection
///
/// The decoder resolves type codes for frames arriving from the peer, so a
/// client codec decodes server frames and vice versa.
#[derive(Debug, Clone, Copy)]
pub struct PacketCodec {
    inbound: Direction,
    max_packet_size: usize,
}

impl PacketCodec {
    /// Codec used by an RCON client (decodes server frames)
    pub const fn client() -> Self {
        Self {
            inbound: Direction::ServerToClient,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }

    /// Codec used by an RCON server (decodes client frames)
    pub const fn server() -> Self {
        Self {
            inbound: Direction::ClientToServer,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }

    /// Set the upper bound accepted for the size field
    pub const fn with_max_packet_size(mut self, max_packet_size: usize) -> Self {
        self.max_packet_size = max_packet_size;
        self
    }

    /// Upper bound accepted for the size field
    pub fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }

    /// Encode a frame
    ///
    /// Fails if the body contains a null byte, which would terminate the
    /// body string early on the server side.
    pub fn encode(&self, request_id: i32, kind: PacketKind, body: &[u8]) -> CodecResult<Vec<u8>> {
        if let Some(offset) = body.iter().position(|&b| b == 0) {
            return Err(CodecError::Encoding(format!(
                "body contains a null byte at offset {}",
                offset
            )));
        }

        let size = i32::try_from(packet_size(body.len())).map_err(|_| {
            CodecError::Encoding(format!("body of {} bytes is too large", body.len()))
        })?;

        let mut frame = Vec::with_capacity(SIZE_FIELD_LEN + size as usize);
        frame.extend_from_slice(&size.to_le_bytes());
        frame.extend_from_slice(&request_id.to_le_bytes());
        frame.extend_from_slice(&kind.code().to_le_bytes());
        frame.extend_from_slice(body);
        frame.extend_from_slice(&[0, 0]);
        Ok(frame)
    }

    /// Decode one frame from a stream
    ///
    /// Blocks on the size field, then on exactly `size` further bytes.
    pub fn decode<R: Read + ?Sized>(&self, stream: &mut R) -> CodecResult<Packet> {
        let mut size_field = [0u8; SIZE_FIELD_LEN];
        match read_full(stream, &mut size_field)? {
            0 => return Err(CodecError::ConnectionClosed),
            n if n < SIZE_FIELD_LEN => {
                return Err(CodecError::Framing(format!(
                    "connection closed after {} of {} size bytes",
                    n, SIZE_FIELD_LEN
                )))
            }
            _ => {}
        }

        let size = i32::from_le_bytes(size_field);
        if size < MIN_PACKET_SIZE as i32 || size as usize > self.max_packet_size {
            return Err(CodecError::Framing(format!(
                "declared size {} outside {}..={}",
                size, MIN_PACKET_SIZE, self.max_packet_size
            )));
        }

        let size_len = size as usize;
        let mut payload = vec![0u8; size_len];
        let received = read_full(stream, &mut payload)?;
        if received < size_len {
            return Err(CodecError::Framing(format!(
                "connection closed after {} of {} payload bytes",
                received, size_len
            )));
        }

        let request_id = i32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
        let code = i32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]);
        let kind = PacketKind::from_code(code, self.inbound).ok_or_else(|| {
            CodecError::Consistency(format!("unknown packet type {} ({:?})", code, self.inbound))
        })?;

        let body_end = size_len - TERMINATOR_LEN;
        if payload[body_end..] != [0, 0] {
            return Err(CodecError::Consistency(format!(
                "missing terminators at offset {} (request id {})",
                body_end, request_id
            )));
        }

        payload.truncate(body_end);
        payload.drain(..HEADER_LEN);

        Ok(Packet {
            size,
            request_id,
            kind,
            body: payload,
        })
    }
}

impl Default for PacketCodec {
    fn default() -> Self {
        Self::client()
    }
}

/// Fill `buf` until it is full or the stream reports end of file
///
/// Returns the number of bytes read.
fn read_full<R: Read + ?Sized>(stream: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
